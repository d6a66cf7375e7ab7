#![doc(test(attr(deny(warnings))))]

//! Budget Schedule turns recurring transaction definitions ("rent, monthly on
//! the 3rd") into the dated occurrences that fall inside a date window.
//!
//! ```
//! use budget_schedule::ledger::{Budget, CreateRecurringTransaction};
//! use chrono::{FixedOffset, TimeZone, Utc};
//!
//! let mut budget = Budget::with_zone(FixedOffset::east_opt(0).unwrap());
//! budget.add_recurring_transaction(CreateRecurringTransaction::monthly("Rent", -1200.0, 3));
//!
//! let start = Utc.with_ymd_and_hms(1990, 6, 1, 0, 0, 0).unwrap();
//! let end = Utc.with_ymd_and_hms(1990, 7, 31, 0, 0, 0).unwrap();
//! let dates: Vec<String> = budget
//!     .view_scheduled_transactions(&start, &end)
//!     .iter()
//!     .map(|st| st.date.format())
//!     .collect();
//! assert_eq!(dates, ["06/03/1990", "07/03/1990"]);
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Schedule tracing initialized.");
    });
}
