use tracing::{debug, warn};

use super::calendar::{to_calendar_date, CalendarDate, Instant, LocalZone};
use super::collation::NameCollator;
use super::rule::RecurrenceRule;
use super::transaction::{RecurringTransaction, ScheduledTransaction};

/// Dates between `start` and `end` (inclusive) on which `rule` applies.
///
/// Walks the window one day at a time, so cost is linear in its length.
pub fn occurrence_dates(
    rule: &RecurrenceRule,
    start: CalendarDate,
    end: CalendarDate,
) -> impl Iterator<Item = CalendarDate> + '_ {
    start.through(end).filter(move |date| rule.applies(*date))
}

/// Expands one recurring transaction into its occurrences inside the window.
///
/// Window edges are instants; they are reduced to local calendar dates before
/// iterating, and both edge dates are included. An empty or inverted window
/// yields no occurrences.
pub fn expand(
    transaction: &RecurringTransaction,
    start: &Instant,
    end: &Instant,
    zone: &dyn LocalZone,
) -> Vec<ScheduledTransaction> {
    if start >= end {
        warn!(
            transaction_id = transaction.id,
            %start,
            %end,
            "start date must be before end date; nothing to expand"
        );
        return Vec::new();
    }

    let first = to_calendar_date(start, zone);
    let last = to_calendar_date(end, zone);

    let scheduled: Vec<ScheduledTransaction> =
        occurrence_dates(&transaction.recurrence_rule, first, last)
            .map(|date| ScheduledTransaction::from_recurring(date, transaction))
            .collect();

    debug!(
        transaction_id = transaction.id,
        rule = %transaction.recurrence_rule,
        from = %first,
        to = %last,
        occurrences = scheduled.len(),
        "expanded recurring transaction"
    );
    scheduled
}

/// Expands every transaction for the window and returns the combined schedule
/// ordered by date, then by collated name.
pub fn schedule_for_window(
    transactions: &[RecurringTransaction],
    start: &Instant,
    end: &Instant,
    zone: &dyn LocalZone,
) -> Vec<ScheduledTransaction> {
    let mut scheduled: Vec<ScheduledTransaction> = transactions
        .iter()
        .flat_map(|transaction| expand(transaction, start, end, zone))
        .collect();
    let names = NameCollator::new();
    // Stable sort: equal (date, name) pairs keep insertion order.
    scheduled.sort_by(|a, b| a.schedule_order(b, &names));
    scheduled
}
