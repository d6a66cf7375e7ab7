mod common;

use budget_schedule::ledger::{
    occurrence_dates, CalendarDate, CreateRecurringTransaction, NameCollator, RecurrenceRule,
};
use chrono::{Datelike, Duration, NaiveDate};
use common::{midnight_utc, utc_budget};
use proptest::prelude::*;

fn day_from(offset: i64) -> CalendarDate {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    CalendarDate::from_naive(epoch + Duration::days(offset))
}

fn window() -> impl Strategy<Value = (CalendarDate, CalendarDate)> {
    (0i64..40_000, 0i64..400).prop_map(|(start, len)| (day_from(start), day_from(start + len)))
}

fn gaps(dates: &[CalendarDate]) -> Vec<i64> {
    dates
        .windows(2)
        .map(|pair| (pair[1].naive() - pair[0].naive()).num_days())
        .collect()
}

proptest! {
    #[test]
    fn monthly_hits_exactly_the_matching_days(day in 1u32..=31, (start, end) in window()) {
        let dates: Vec<CalendarDate> =
            occurrence_dates(&RecurrenceRule::monthly(day), start, end).collect();
        let expected = start
            .naive()
            .iter_days()
            .take_while(|d| *d <= end.naive())
            .filter(|d| d.day() == day)
            .count();
        prop_assert_eq!(dates.len(), expected);
        prop_assert!(dates.iter().all(|d| d.day() == day && *d >= start && *d <= end));
    }

    #[test]
    fn plain_weekly_is_every_seventh_day(day in 0u32..7, (start, end) in window()) {
        let dates: Vec<CalendarDate> =
            occurrence_dates(&RecurrenceRule::weekly(day), start, end).collect();
        prop_assert!(dates.iter().all(|d| d.weekday_from_sunday() == day));
        prop_assert!(gaps(&dates).iter().all(|gap| *gap == 7));
        let span = (end.naive() - start.naive()).num_days() + 1;
        prop_assert!(dates.len() as i64 >= span / 7);
        prop_assert!(dates.len() as i64 <= span / 7 + 1);
    }

    #[test]
    fn interval_weekly_steps_by_whole_intervals(
        basis in (0i64..40_000).prop_map(day_from),
        interval in 1u32..6,
        day in 0u32..7,
        (start, end) in window(),
    ) {
        let rule = RecurrenceRule::weekly_every(day, basis, interval);
        let dates: Vec<CalendarDate> = occurrence_dates(&rule, start, end).collect();
        let step = 7 * i64::from(interval);
        prop_assert!(dates
            .iter()
            .all(|d| (d.naive() - basis.naive()).num_days() % step == 0));
        prop_assert!(gaps(&dates).iter().all(|gap| *gap == step));
    }

    #[test]
    fn half_configured_weekly_is_always_empty(
        day in 0u32..7,
        basis in (0i64..40_000).prop_map(day_from),
        interval in 1u32..10,
        (start, end) in window(),
    ) {
        let basis_only = RecurrenceRule::Weekly { day, basis: Some(basis), interval: None };
        let interval_only = RecurrenceRule::Weekly { day, basis: None, interval: Some(interval) };
        prop_assert_eq!(occurrence_dates(&basis_only, start, end).count(), 0);
        prop_assert_eq!(occurrence_dates(&interval_only, start, end).count(), 0);
    }

    #[test]
    fn schedule_is_sorted_and_repeatable(
        entries in prop::collection::vec(("[a-zA-Z]{1,6}", 1u32..=28), 1..12),
        start_offset in 0u32..200,
        len in 1u32..120,
    ) {
        let mut budget = utc_budget();
        for (name, day) in &entries {
            budget.add_recurring_transaction(CreateRecurringTransaction::monthly(name.as_str(), 1.0, *day));
        }
        let start = midnight_utc(1990, 1, 1) + Duration::days(i64::from(start_offset));
        let end = start + Duration::days(i64::from(len));

        let first = budget.view_scheduled_transactions(&start, &end).to_vec();
        let second = budget.view_scheduled_transactions(&start, &end).to_vec();
        prop_assert_eq!(&first, &second);
        let names = NameCollator::new();
        for pair in first.windows(2) {
            prop_assert!(
                pair[0].date < pair[1].date
                    || (pair[0].date == pair[1].date
                        && names.compare(&pair[0].name, &pair[1].name).is_le())
            );
        }
    }

    #[test]
    fn gen_id_counts_up_from_one(kind in "[A-Z][a-z]{2,10}", calls in 1usize..50) {
        let mut budget = utc_budget();
        let ids: Vec<u64> = (0..calls).map(|_| budget.gen_id(&kind)).collect();
        let expected: Vec<u64> = (1..=calls as u64).collect();
        prop_assert_eq!(ids, expected);
    }
}
