//! Calendar dates and the single conversion from instants to local dates.
//!
//! Everything that compares, stores, or displays a date goes through
//! [`CalendarDate`]. Instants only exist at the boundary: window edges and
//! weekly basis values arrive as instants and are converted once, through
//! [`to_calendar_date`], using the [`LocalZone`] of the owning budget.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, LocalResult, NaiveDate, NaiveDateTime,
    Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::BudgetError;

/// A point in time as supplied by callers (date pickers, HTTP params, clocks).
pub type Instant = DateTime<Utc>;

pub const MILLIS_PER_DAY: i64 = 86_400_000;

const DATE_FORMAT: &str = "%m/%d/%Y";
// `num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Source of the wall-clock offset that defines "local" calendar dates.
pub trait LocalZone: Send + Sync + fmt::Debug {
    /// Offset from UTC in effect at `instant`.
    fn offset_at(&self, instant: &Instant) -> FixedOffset;

    /// Resolves a local wall-clock time to an instant, see [`resolve_wall_clock`].
    fn resolve_local(&self, local: NaiveDateTime) -> Option<Instant>;
}

/// The timezone of the running process.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemZone;

impl LocalZone for SystemZone {
    fn offset_at(&self, instant: &Instant) -> FixedOffset {
        Local.offset_from_utc_datetime(&instant.naive_utc())
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<Instant> {
        resolve_wall_clock(&Local, local)
    }
}

impl LocalZone for FixedOffset {
    fn offset_at(&self, _instant: &Instant) -> FixedOffset {
        *self
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<Instant> {
        resolve_wall_clock(self, local)
    }
}

/// A named IANA zone such as `America/New_York`.
impl LocalZone for Tz {
    fn offset_at(&self, instant: &Instant) -> FixedOffset {
        self.offset_from_utc_datetime(&instant.naive_utc()).fix()
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<Instant> {
        resolve_wall_clock(self, local)
    }
}

/// Resolves a wall-clock time in `zone` to an instant.
///
/// A time repeated by a backward shift resolves to its earlier occurrence. A
/// time skipped by a forward shift is read with the offset in effect before
/// the shift, which lands on the first valid instant after the gap.
pub fn resolve_wall_clock<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<Instant> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let before = local.checked_sub_signed(Duration::days(1))?;
            let offset = zone.offset_from_local_datetime(&before).earliest()?.fix();
            let utc = local
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))?;
            Some(Utc.from_utc_datetime(&utc))
        }
    }
}

/// A (year, month, day) value with no time-of-day or offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        CalendarDate(date)
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// Day of the month, 1-based.
    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// Weekday with Sunday as 0 and Saturday as 6.
    pub fn weekday_from_sunday(self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(CalendarDate)
    }

    /// Epoch milliseconds of this date's local midnight, shifted by the local
    /// offset. Equal to [`local_epoch_millis`] of that midnight instant in any
    /// zone where midnight exists.
    pub fn local_epoch_millis(self) -> i64 {
        (i64::from(self.0.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE) * MILLIS_PER_DAY
    }

    /// Canonical `MM/DD/YYYY` representation.
    pub fn format(self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// Parses the canonical `MM/DD/YYYY` representation.
    pub fn parse(input: &str) -> Result<Self, BudgetError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map(CalendarDate)
            .map_err(|_| BudgetError::InvalidDate(format!("`{}` (expected MM/DD/YYYY)", input)))
    }

    /// Every date from `self` to `end`, both inclusive.
    pub fn through(self, end: CalendarDate) -> DaysInclusive {
        DaysInclusive {
            next: Some(self),
            end,
        }
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for CalendarDate {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarDate::parse(s)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        CalendarDate(date)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        CalendarDate::parse(&raw).map_err(de::Error::custom)
    }
}

/// Iterator over consecutive calendar dates, see [`CalendarDate::through`].
#[derive(Debug, Clone)]
pub struct DaysInclusive {
    next: Option<CalendarDate>,
    end: CalendarDate,
}

impl Iterator for DaysInclusive {
    type Item = CalendarDate;

    fn next(&mut self) -> Option<CalendarDate> {
        let current = self.next.filter(|date| *date <= self.end)?;
        self.next = current.succ();
        Some(current)
    }
}

/// Converts an instant to the calendar date shown by the local wall clock.
pub fn to_calendar_date(instant: &Instant, zone: &dyn LocalZone) -> CalendarDate {
    let offset = zone.offset_at(instant);
    CalendarDate(instant.with_timezone(&offset).date_naive())
}

/// Epoch milliseconds of `instant` shifted by the local offset in effect then.
pub fn local_epoch_millis(instant: &Instant, zone: &dyn LocalZone) -> i64 {
    let offset = zone.offset_at(instant);
    instant.timestamp_millis() + i64::from(offset.local_minus_utc()) * 1000
}

/// The instant at which `date` begins on the local wall clock.
pub fn instant_at_local_midnight(date: CalendarDate, zone: &dyn LocalZone) -> Option<Instant> {
    let midnight = date.0.and_hms_opt(0, 0, 0)?;
    zone.resolve_local(midnight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset_hours(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Instant {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn format_pads_month_and_day() {
        let date = CalendarDate::from_ymd(1990, 6, 3).unwrap();
        assert_eq!(date.format(), "06/03/1990");
        assert_eq!(date.to_string(), "06/03/1990");
    }

    #[test]
    fn parse_accepts_canonical_form_only() {
        let date: CalendarDate = "12/14/1990".parse().unwrap();
        assert_eq!(date, CalendarDate::from_ymd(1990, 12, 14).unwrap());
        assert!(CalendarDate::parse("1990-12-14").is_err());
        assert!(CalendarDate::parse("13/01/1990").is_err());
    }

    #[test]
    fn conversion_uses_the_local_wall_clock() {
        // 02:15 UTC is still the previous evening in New York.
        let instant = utc(1990, 5, 23, 2, 15);
        assert_eq!(
            to_calendar_date(&instant, &offset_hours(-4)),
            CalendarDate::from_ymd(1990, 5, 22).unwrap()
        );
        assert_eq!(
            to_calendar_date(&instant, &offset_hours(0)),
            CalendarDate::from_ymd(1990, 5, 23).unwrap()
        );
        assert_eq!(
            to_calendar_date(&utc(1990, 5, 23, 22, 0), &offset_hours(9)),
            CalendarDate::from_ymd(1990, 5, 24).unwrap()
        );
    }

    #[test]
    fn local_epoch_of_midnight_matches_date_epoch() {
        let zone = offset_hours(-5);
        let date = CalendarDate::from_ymd(1990, 12, 14).unwrap();
        let midnight = instant_at_local_midnight(date, &zone).unwrap();
        assert_eq!(to_calendar_date(&midnight, &zone), date);
        assert_eq!(local_epoch_millis(&midnight, &zone), date.local_epoch_millis());
    }

    #[test]
    fn skipped_wall_clock_resolves_after_the_gap() {
        let zone: Tz = "America/New_York".parse().unwrap();
        // 02:30 on 1990-04-01 never happened in New York; clocks went 02:00 -> 03:00.
        let local = NaiveDate::from_ymd_opt(1990, 4, 1)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert_eq!(resolve_wall_clock(&zone, local), Some(utc(1990, 4, 1, 7, 30)));
    }

    #[test]
    fn repeated_wall_clock_resolves_to_first_occurrence() {
        let zone: Tz = "America/New_York".parse().unwrap();
        // 01:30 on 1990-10-28 happened twice, first in EDT.
        let local = NaiveDate::from_ymd_opt(1990, 10, 28)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert_eq!(resolve_wall_clock(&zone, local), Some(utc(1990, 10, 28, 5, 30)));
    }

    #[test]
    fn skipped_midnight_starts_the_day_at_the_first_valid_instant() {
        // Sao Paulo went from 00:00 -03 straight to 01:00 -02 on 2018-11-04.
        let zone: Tz = "America/Sao_Paulo".parse().unwrap();
        let date = CalendarDate::from_ymd(2018, 11, 4).unwrap();
        let start = instant_at_local_midnight(date, &zone).unwrap();
        assert_eq!(start, utc(2018, 11, 4, 3, 0));
        assert_eq!(to_calendar_date(&start, &zone), date);
    }

    #[test]
    fn named_zone_offset_follows_daylight_saving() {
        let zone: Tz = "America/New_York".parse().unwrap();
        assert_eq!(zone.offset_at(&utc(1990, 1, 15, 12, 0)), offset_hours(-5));
        assert_eq!(zone.offset_at(&utc(1990, 7, 15, 12, 0)), offset_hours(-4));
    }

    #[test]
    fn epoch_day_is_zero() {
        let epoch = CalendarDate::from_ymd(1970, 1, 1).unwrap();
        assert_eq!(epoch.local_epoch_millis(), 0);
        assert_eq!(epoch.succ().unwrap().local_epoch_millis(), MILLIS_PER_DAY);
    }

    #[test]
    fn weekday_counts_from_sunday() {
        // 1990-06-03 was a Sunday.
        let sunday = CalendarDate::from_ymd(1990, 6, 3).unwrap();
        assert_eq!(sunday.weekday_from_sunday(), 0);
        assert_eq!(sunday.succ().unwrap().weekday_from_sunday(), 1);
    }

    #[test]
    fn through_is_inclusive_and_crosses_months() {
        let start = CalendarDate::from_ymd(1990, 1, 30).unwrap();
        let end = CalendarDate::from_ymd(1990, 2, 2).unwrap();
        let days: Vec<String> = start.through(end).map(CalendarDate::format).collect();
        assert_eq!(days, ["01/30/1990", "01/31/1990", "02/01/1990", "02/02/1990"]);
        assert_eq!(end.through(start).count(), 0);
    }

    #[test]
    fn serde_uses_canonical_string() {
        let date = CalendarDate::from_ymd(2024, 2, 29).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"02/29/2024\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }
}
