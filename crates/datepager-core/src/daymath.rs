#![forbid(unsafe_code)]

//! Civil-date arithmetic for the pager.
//!
//! Thin helpers over [`chrono::NaiveDate`] that the timeline generator and
//! scroll controller share: weekday slots relative to a configurable first
//! day of week, month boundaries, and saturating month offsets.
//!
//! All functions are pure. Dates near the `chrono` representable range are
//! clamped rather than panicking, so a pathological window size degrades to
//! a shorter usable window instead of tearing down the calendar.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

/// Map a `0..=6` index (0 = Sunday) to a [`Weekday`].
///
/// Returns `None` for out-of-range indices; the caller decides the fallback.
#[must_use]
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Column of `date` in a week that starts on `first`, in `0..=6`.
#[must_use]
pub fn weekday_slot(date: NaiveDate, first: Weekday) -> u32 {
    (7 + date.weekday().num_days_from_sunday() - first.num_days_from_sunday()) % 7
}

/// Most recent `first`-day on or before `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate, first: Weekday) -> NaiveDate {
    let slot = weekday_slot(date, first);
    date.checked_sub_days(Days::new(u64::from(slot))).unwrap_or(NaiveDate::MIN)
}

/// First day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = first
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);
    next.signed_duration_since(first).num_days() as u32
}

/// Offset a first-of-month date by `delta` whole months, saturating at the
/// representable range.
///
/// The result is always a first-of-month date when the input is.
#[must_use]
pub fn add_months(first: NaiveDate, delta: i32) -> NaiveDate {
    if delta >= 0 {
        first
            .checked_add_months(Months::new(delta as u32))
            .unwrap_or(NaiveDate::MAX)
    } else {
        first
            .checked_sub_months(Months::new(delta.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Linear month index (`year * 12 + month0`) for O(1) month distance.
#[must_use]
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Offset `date` by `delta` whole days, saturating at the representable range.
#[must_use]
pub fn add_days(date: NaiveDate, delta: i64) -> NaiveDate {
    if delta >= 0 {
        date.checked_add_days(Days::new(delta as u64))
            .unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(Days::new(delta.unsigned_abs()))
            .unwrap_or(NaiveDate::MIN)
    }
}

/// Clamp a day-of-month onto the month containing `month_first`.
///
/// Day 31 lands on the 28th/29th/30th when the target month is shorter.
#[must_use]
pub fn clamp_day_of_month(month_first: NaiveDate, day: u32) -> NaiveDate {
    let clamped = day.clamp(1, days_in_month(month_first));
    month_first.with_day(clamped).unwrap_or(month_first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekday_index_round_trip() {
        assert_eq!(weekday_from_index(0), Some(Weekday::Sun));
        assert_eq!(weekday_from_index(6), Some(Weekday::Sat));
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn slot_relative_to_sunday() {
        // 2025-01-05 is a Sunday.
        assert_eq!(weekday_slot(d(2025, 1, 5), Weekday::Sun), 0);
        assert_eq!(weekday_slot(d(2025, 1, 8), Weekday::Sun), 3);
        assert_eq!(weekday_slot(d(2025, 1, 11), Weekday::Sun), 6);
    }

    #[test]
    fn slot_relative_to_monday() {
        assert_eq!(weekday_slot(d(2025, 1, 6), Weekday::Mon), 0);
        assert_eq!(weekday_slot(d(2025, 1, 5), Weekday::Mon), 6);
    }

    #[test]
    fn week_start_is_idempotent() {
        let start = start_of_week(d(2025, 1, 8), Weekday::Sun);
        assert_eq!(start, d(2025, 1, 5));
        assert_eq!(start_of_week(start, Weekday::Sun), start);
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(d(2025, 2, 10)), 28);
        assert_eq!(days_in_month(d(2024, 2, 10)), 29); // leap year
        assert_eq!(days_in_month(d(2025, 1, 31)), 31);
        assert_eq!(days_in_month(d(2025, 4, 1)), 30);
        assert_eq!(days_in_month(d(2025, 12, 25)), 31);
    }

    #[test]
    fn month_offsets_cross_year() {
        assert_eq!(add_months(d(2024, 11, 1), 3), d(2025, 2, 1));
        assert_eq!(add_months(d(2025, 2, 1), -3), d(2024, 11, 1));
        assert_eq!(add_months(d(2025, 6, 1), 0), d(2025, 6, 1));
    }

    #[test]
    fn month_index_distance() {
        assert_eq!(month_index(d(2025, 1, 15)) - month_index(d(2024, 12, 3)), 1);
        assert_eq!(month_index(d(2026, 6, 1)) - month_index(d(2024, 6, 30)), 24);
    }

    #[test]
    fn clamp_day_onto_short_month() {
        assert_eq!(clamp_day_of_month(d(2025, 2, 1), 31), d(2025, 2, 28));
        assert_eq!(clamp_day_of_month(d(2024, 2, 1), 31), d(2024, 2, 29));
        assert_eq!(clamp_day_of_month(d(2025, 3, 1), 15), d(2025, 3, 15));
    }

    #[test]
    fn add_days_saturates() {
        assert_eq!(add_days(NaiveDate::MAX, 10), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -10), NaiveDate::MIN);
        assert_eq!(add_days(d(2025, 1, 1), 31), d(2025, 2, 1));
        assert_eq!(add_days(d(2025, 1, 1), -1), d(2024, 12, 31));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn start_of_week_lands_on_first(days in 0i64..100_000, first_idx in 0u8..7) {
                let date = add_days(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap(), days);
                let first = weekday_from_index(first_idx).unwrap();
                let start = start_of_week(date, first);
                prop_assert_eq!(start.weekday(), first);
                prop_assert!(start <= date);
                prop_assert!(date.signed_duration_since(start).num_days() < 7);
            }

            #[test]
            fn clamped_day_stays_in_month(months in -2000i32..2000, day in 1u32..=31) {
                let first = add_months(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), months);
                let clamped = clamp_day_of_month(first, day);
                prop_assert_eq!(clamped.month(), first.month());
                prop_assert_eq!(clamped.year(), first.year());
            }
        }
    }
}
