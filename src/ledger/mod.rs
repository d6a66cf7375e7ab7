//! Recurrence rules, calendar dates, schedule expansion, and the budget aggregate.

pub mod budget;
pub mod calendar;
pub mod collation;
pub mod ids;
pub mod recurring;
pub mod rule;
pub mod transaction;

pub use budget::Budget;
pub use calendar::{
    instant_at_local_midnight, local_epoch_millis, resolve_wall_clock, to_calendar_date,
    CalendarDate, Instant, LocalZone, SystemZone,
};
pub use collation::{compare_names, NameCollator};
pub use ids::IdGenerator;
pub use recurring::{expand, occurrence_dates, schedule_for_window};
pub use rule::{CreateRecurrenceRule, RecurrenceRule};
pub use transaction::{
    CreateRecurringTransaction, EditRecurringTransaction, RecurringTransaction,
    ScheduledTransaction, RECURRING_TRANSACTION,
};
