#![allow(dead_code)]

use budget_schedule::ledger::{Budget, CalendarDate, Instant};
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone `hours` east of UTC.
pub fn zone(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours * 3600).expect("valid offset")
}

/// IANA zone by name, e.g. `America/New_York`.
pub fn named(name: &str) -> Tz {
    name.parse().expect("known zone")
}

pub fn utc_budget() -> Budget {
    Budget::with_zone(zone(0))
}

pub fn midnight_utc(y: i32, m: u32, d: u32) -> Instant {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

/// Parses an RFC 3339 timestamp with its own offset into an instant.
pub fn instant(rfc3339: &str) -> Instant {
    DateTime::parse_from_rfc3339(rfc3339)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub fn date(y: i32, m: u32, d: u32) -> CalendarDate {
    CalendarDate::from_ymd(y, m, d).expect("valid date")
}

pub fn formatted<'a>(dates: impl IntoIterator<Item = &'a CalendarDate>) -> Vec<String> {
    dates.into_iter().map(|d| d.format()).collect()
}
