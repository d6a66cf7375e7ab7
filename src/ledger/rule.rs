//! Recurrence rules: which calendar dates a recurring transaction lands on.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::calendar::{to_calendar_date, CalendarDate, Instant, LocalZone, MILLIS_PER_DAY};

const DAYS_PER_WEEK: f64 = 7.0;

/// Stored recurrence rule. `basis` is already a local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recurrenceType", rename_all = "lowercase")]
pub enum RecurrenceRule {
    Monthly {
        day: u32,
    },
    Weekly {
        day: u32,
        basis: Option<CalendarDate>,
        interval: Option<u32>,
    },
}

impl RecurrenceRule {
    pub fn monthly(day: u32) -> Self {
        RecurrenceRule::Monthly { day }
    }

    pub fn weekly(day: u32) -> Self {
        RecurrenceRule::Weekly {
            day,
            basis: None,
            interval: None,
        }
    }

    pub fn weekly_every(day: u32, basis: CalendarDate, interval: u32) -> Self {
        RecurrenceRule::Weekly {
            day,
            basis: Some(basis),
            interval: Some(interval),
        }
    }

    /// Whether a transaction following this rule occurs on `date`.
    pub fn applies(&self, date: CalendarDate) -> bool {
        match self {
            RecurrenceRule::Monthly { day } => date.day() == *day,
            RecurrenceRule::Weekly {
                day,
                basis,
                interval,
            } => weekly_applies(date, *day, *basis, *interval),
        }
    }

    pub fn label(&self) -> String {
        match self {
            RecurrenceRule::Monthly { day } => format!("Monthly on day {}", day),
            RecurrenceRule::Weekly {
                day,
                basis,
                interval,
            } => match (*basis, interval.filter(|weeks| *weeks > 0)) {
                (Some(basis), Some(interval)) => {
                    format!("Every {} week(s) from {}", interval, basis)
                }
                (None, None) => format!("Weekly on {}", weekday_name(*day)),
                _ => "Weekly (inactive: basis and interval must be set together)".into(),
            },
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// A zero interval counts as unset, matching how rule definitions are entered.
fn weekly_applies(
    date: CalendarDate,
    day: u32,
    basis: Option<CalendarDate>,
    interval: Option<u32>,
) -> bool {
    match (basis, interval.filter(|weeks| *weeks > 0)) {
        (Some(basis), Some(interval)) => {
            let day_delta =
                (date.local_epoch_millis() - basis.local_epoch_millis()).div_euclid(MILLIS_PER_DAY);
            // Real-valued division and remainder, kept literally: only whole
            // multiples of `7 * interval` days yield a zero remainder.
            (day_delta as f64 / DAYS_PER_WEEK) % f64::from(interval) == 0.0
        }
        (Some(_), None) | (None, Some(_)) => false,
        (None, None) => date.weekday_from_sunday() == day,
    }
}

fn weekday_name(day: u32) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "day ?",
    }
}

/// Rule as submitted by callers: a weekly `basis` is still an instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recurrenceType", rename_all = "lowercase")]
pub enum CreateRecurrenceRule {
    Monthly {
        day: u32,
    },
    Weekly {
        day: u32,
        #[serde(default)]
        basis: Option<Instant>,
        #[serde(default)]
        interval: Option<u32>,
    },
}

impl CreateRecurrenceRule {
    /// Normalizes embedded instants to local calendar dates.
    pub fn normalize(&self, zone: &dyn LocalZone) -> RecurrenceRule {
        match self {
            CreateRecurrenceRule::Monthly { day } => RecurrenceRule::Monthly { day: *day },
            CreateRecurrenceRule::Weekly {
                day,
                basis,
                interval,
            } => RecurrenceRule::Weekly {
                day: *day,
                basis: basis.as_ref().map(|instant| to_calendar_date(instant, zone)),
                interval: *interval,
            },
        }
    }
}
