#![forbid(unsafe_code)]

//! Pager configuration.
//!
//! A misconfigured pager must never blank the calendar screen, so invalid
//! values are normalized to safe defaults at construction instead of being
//! reported as errors:
//!
//! | Input | Fallback |
//! |-------|----------|
//! | `window_size == 0` | [`DEFAULT_WINDOW_SIZE`] |
//! | odd `window_size` | next even size |
//! | first-day-of-week index `> 6` | Sunday |
//!
//! "Today" is injected here and captured once; nothing in the workspace
//! reads the wall clock, so pages never silently shift at midnight and every
//! test is deterministic.

use chrono::{NaiveDate, Weekday};

use crate::daymath;

/// Default window size in pages (4 years of months, ~9 years of weeks).
pub const DEFAULT_WINDOW_SIZE: usize = 48;

/// Page shape: one week per page or one month grid per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerMode {
    /// 7 contiguous days per page.
    Week,
    /// Full calendar grid (4–6 rows) per page.
    Month,
}

/// Pixel metrics used to derive page heights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageMetrics {
    /// Height of the page header (month/week title).
    pub header: f32,
    /// Height of the weekday-name row.
    pub weekday_row: f32,
    /// Height of one row of day cells.
    pub cell_size: f32,
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self {
            header: 32.0,
            weekday_row: 24.0,
            cell_size: 48.0,
        }
    }
}

impl PageMetrics {
    /// Height of a page with `rows` rows of day cells.
    #[must_use]
    pub fn page_height(&self, rows: u16) -> f32 {
        self.header + self.weekday_row + f32::from(rows) * self.cell_size
    }
}

/// Construction-time configuration for the pager.
#[derive(Debug, Clone)]
pub struct PagerConfig {
    /// Page shape.
    pub mode: PagerMode,
    /// Number of pages in the window. Normalized to a positive even count.
    pub window_size: usize,
    /// First day of the week (default Sunday).
    pub first_day_of_week: Weekday,
    /// "Today", captured once at mount.
    pub today: NaiveDate,
    /// Pixel metrics for layout.
    pub metrics: PageMetrics,
}

impl PagerConfig {
    /// Create a month-mode config anchored on `today` with defaults.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            mode: PagerMode::Month,
            window_size: DEFAULT_WINDOW_SIZE,
            first_day_of_week: Weekday::Sun,
            today,
            metrics: PageMetrics::default(),
        }
    }

    /// Set the page shape.
    #[must_use]
    pub fn mode(mut self, mode: PagerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the window size in pages.
    #[must_use]
    pub fn window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the first day of the week.
    #[must_use]
    pub fn first_day_of_week(mut self, first: Weekday) -> Self {
        self.first_day_of_week = first;
        self
    }

    /// Set the first day of the week from a `0..=6` index (0 = Sunday).
    ///
    /// Out-of-range indices fall back to Sunday.
    #[must_use]
    pub fn first_day_of_week_index(mut self, index: u8) -> Self {
        self.first_day_of_week = match daymath::weekday_from_index(index) {
            Some(weekday) => weekday,
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(index, "first-day-of-week index out of range, using Sunday");
                Weekday::Sun
            }
        };
        self
    }

    /// Set the pixel metrics.
    #[must_use]
    pub fn metrics(mut self, metrics: PageMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Return a copy with invalid values clamped to safe defaults.
    ///
    /// Called by the timeline generator; calling it twice is a no-op.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut out = self.clone();
        if out.window_size == 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!("window size 0, using default {DEFAULT_WINDOW_SIZE}");
            out.window_size = DEFAULT_WINDOW_SIZE;
        } else if out.window_size % 2 != 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                window_size = out.window_size,
                "odd window size, rounding up to even"
            );
            out.window_size += 1;
        }
        out
    }
}
