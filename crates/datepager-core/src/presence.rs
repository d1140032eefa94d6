#![forbid(unsafe_code)]

//! Event presence index.
//!
//! Answers "does this calendar day have at least one event?" in O(1) without
//! scanning the event list per page. Build cost is proportional to the event
//! count only — never to the window size — so a 48-month window over tens of
//! thousands of day-cells costs the same as a one-week window.
//!
//! Timestamps are normalized to a calendar-day key in a caller-supplied
//! fixed UTC offset (default UTC), captured once at build time like the
//! pager's "today". Unparseable stamps are skipped and counted, never fatal.

use ahash::AHashSet;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Anything that carries an ISO-8601 start timestamp.
///
/// The pager never sees the caller's event type; this seam is the whole
/// contract.
pub trait EventSource {
    /// ISO-8601 start timestamp (`2025-03-10T18:00:00Z`, a naive datetime,
    /// or a bare `YYYY-MM-DD` date).
    fn start_timestamp(&self) -> &str;
}

impl EventSource for str {
    fn start_timestamp(&self) -> &str {
        self
    }
}

impl EventSource for String {
    fn start_timestamp(&self) -> &str {
        self
    }
}

impl<T: EventSource + ?Sized> EventSource for &T {
    fn start_timestamp(&self) -> &str {
        (**self).start_timestamp()
    }
}

/// Set-based day→has-event lookup.
#[derive(Debug, Clone, Default)]
pub struct EventPresenceIndex {
    days: AHashSet<NaiveDate>,
    skipped: usize,
}

impl EventPresenceIndex {
    /// An empty index: every day answers `false`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an event list, normalizing starts to UTC calendar days.
    #[must_use]
    pub fn build<I, E>(events: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: EventSource,
    {
        Self::build_with_offset(events, FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    /// Build from an event list, normalizing starts to calendar days in the
    /// given fixed UTC offset.
    #[must_use]
    pub fn build_with_offset<I, E>(events: I, offset: FixedOffset) -> Self
    where
        I: IntoIterator<Item = E>,
        E: EventSource,
    {
        let mut days = AHashSet::new();
        let mut skipped = 0usize;
        for event in events {
            let stamp = event.start_timestamp();
            match day_key(stamp, offset) {
                Some(day) => {
                    days.insert(day);
                }
                None => {
                    skipped += 1;
                    #[cfg(feature = "tracing")]
                    tracing::warn!(stamp, "unparseable event start, skipping");
                }
            }
        }
        Self { days, skipped }
    }

    /// Whether any event starts on `date`. O(1).
    #[inline]
    #[must_use]
    pub fn has_event(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Number of distinct days with events.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// Whether no day has an event.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of event stamps skipped as unparseable (diagnostic).
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Parse a timestamp and reduce it to a calendar day in `offset`.
///
/// Accepts RFC 3339 (offset-aware), a naive ISO datetime, or a bare date.
/// Naive forms are taken as already being in the target offset.
fn day_key(stamp: &str, offset: FixedOffset) -> Option<NaiveDate> {
    if let Ok(aware) = DateTime::parse_from_rfc3339(stamp) {
        return Some(aware.with_timezone(&offset).date_naive());
    }
    if let Ok(naive) = stamp.parse::<NaiveDateTime>() {
        return Some(naive.date());
    }
    stamp.parse::<NaiveDate>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn presence_matches_event_day() {
        // Scenario: one event at 2025-03-10T18:00:00Z.
        let index = EventPresenceIndex::build(["2025-03-10T18:00:00Z"]);
        assert!(index.has_event(d(2025, 3, 10)));
        assert!(!index.has_event(d(2025, 3, 11)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn time_of_day_is_ignored() {
        let index = EventPresenceIndex::build([
            "2025-03-10T00:00:00Z",
            "2025-03-10T23:59:59Z",
        ]);
        assert_eq!(index.len(), 1);
        assert!(index.has_event(d(2025, 3, 10)));
    }

    #[test]
    fn offset_shifts_the_day_key() {
        // 23:00Z on March 10 is already March 11 at UTC+2.
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let index =
            EventPresenceIndex::build_with_offset(["2025-03-10T23:00:00Z"], plus_two);
        assert!(index.has_event(d(2025, 3, 11)));
        assert!(!index.has_event(d(2025, 3, 10)));
    }

    #[test]
    fn offset_in_stamp_is_honored() {
        // 01:00 at +03:00 is 22:00Z the previous day.
        let index = EventPresenceIndex::build(["2025-03-11T01:00:00+03:00"]);
        assert!(index.has_event(d(2025, 3, 10)));
    }

    #[test]
    fn naive_and_bare_forms_accepted() {
        let index = EventPresenceIndex::build(["2025-03-10T18:00:00", "2025-04-01"]);
        assert!(index.has_event(d(2025, 3, 10)));
        assert!(index.has_event(d(2025, 4, 1)));
        assert_eq!(index.skipped(), 0);
    }

    #[test]
    fn garbage_is_skipped_and_counted() {
        let index = EventPresenceIndex::build(["not a date", "", "2025-03-10T18:00:00Z"]);
        assert_eq!(index.skipped(), 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn empty_index_answers_false() {
        let index = EventPresenceIndex::new();
        assert!(index.is_empty());
        assert!(!index.has_event(d(2025, 1, 1)));
    }

    #[test]
    fn owned_strings_work_through_the_seam() {
        let events = vec!["2025-06-01T09:00:00Z".to_string()];
        let index = EventPresenceIndex::build(&events);
        assert!(index.has_event(d(2025, 6, 1)));
    }

    #[test]
    fn custom_event_type_through_the_seam() {
        struct Meeting {
            start: String,
        }
        impl EventSource for Meeting {
            fn start_timestamp(&self) -> &str {
                &self.start
            }
        }
        let meetings = [Meeting {
            start: "2025-07-04T12:00:00Z".into(),
        }];
        let index = EventPresenceIndex::build(&meetings);
        assert!(index.has_event(d(2025, 7, 4)));
    }

    #[test]
    fn build_cost_tracks_event_count_not_window() {
        // Structural stand-in for the O(events) property: the index stores
        // one key per distinct day regardless of how wide a window will
        // query it.
        let events: Vec<String> = (0..100)
            .map(|i| format!("2025-03-{:02}T10:00:00Z", (i % 28) + 1))
            .collect();
        let index = EventPresenceIndex::build(&events);
        assert_eq!(index.len(), 28);
    }
}
