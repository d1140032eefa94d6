#![forbid(unsafe_code)]

//! Page layout index: O(1) pixel offsets over variable-height pages.
//!
//! Month grids are 4–6 rows tall depending on calendar alignment, so page
//! offsets cannot be computed as `index * constant`. This index precomputes
//! a prefix-sum table once per timeline build, answering any page's offset
//! and height without measuring its predecessors. Week windows, where every
//! page has the same height, degenerate to a closed form with no table.
//!
//! | Operation | Fixed (week) | Variable (month) |
//! |-----------|--------------|------------------|
//! | `offset_of` | O(1) | O(1) |
//! | `height_of` | O(1) | O(1) |
//! | `index_at_offset` | O(1) | O(log n) |
//! | `nearest_index` | O(1) | O(log n) |
//!
//! The timeline is immutable after generation, so the table never takes
//! point updates — it is rebuilt wholesale when the timeline is.

use std::ops::Range;

use crate::config::PageMetrics;
use crate::timeline::Timeline;

/// Offset/height table over a timeline's pages.
#[derive(Debug, Clone)]
pub enum PageLayout {
    /// Every page has the same height (week mode).
    Fixed {
        /// Height of each page.
        page_height: f32,
        /// Number of pages.
        len: usize,
    },
    /// Per-page heights (month mode); `offsets[i]` is the top of page `i`,
    /// `offsets[len]` the total height.
    Variable {
        /// Prefix sums, `len + 1` entries, starting at 0.
        offsets: Vec<f32>,
    },
}

impl PageLayout {
    /// Build the layout for `timeline` under `metrics`.
    ///
    /// Uniform-height timelines (week mode) get the closed form; anything
    /// else gets the prefix table.
    #[must_use]
    pub fn build(timeline: &Timeline, metrics: &PageMetrics) -> Self {
        let pages = timeline.pages();
        let uniform = pages
            .windows(2)
            .all(|pair| pair[0].rows == pair[1].rows);
        if uniform {
            let page_height = pages.first().map_or(0.0, |p| p.height(metrics));
            return Self::Fixed {
                page_height,
                len: pages.len(),
            };
        }

        let mut offsets = Vec::with_capacity(pages.len() + 1);
        let mut running = 0.0f32;
        offsets.push(0.0);
        for page in pages {
            running += page.height(metrics);
            offsets.push(running);
        }
        Self::Variable { offsets }
    }

    /// Number of pages covered.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Fixed { len, .. } => *len,
            Self::Variable { offsets } => offsets.len() - 1,
        }
    }

    /// Whether the layout covers no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixel offset of the top of page `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> f32 {
        assert!(index < self.len(), "page index {index} out of bounds");
        match self {
            Self::Fixed { page_height, .. } => index as f32 * page_height,
            Self::Variable { offsets } => offsets[index],
        }
    }

    /// Pixel height of page `index`.
    ///
    /// # Panics
    /// Panics if `index >= len`.
    #[must_use]
    pub fn height_of(&self, index: usize) -> f32 {
        assert!(index < self.len(), "page index {index} out of bounds");
        match self {
            Self::Fixed { page_height, .. } => *page_height,
            Self::Variable { offsets } => offsets[index + 1] - offsets[index],
        }
    }

    /// Total pixel height of the window.
    #[must_use]
    pub fn total(&self) -> f32 {
        match self {
            Self::Fixed { page_height, len } => *len as f32 * page_height,
            Self::Variable { offsets } => *offsets.last().unwrap_or(&0.0),
        }
    }

    /// Index of the page containing `offset`, clamped to the window.
    ///
    /// Negative offsets (rubber-banding past the top) clamp to 0; offsets
    /// past the end clamp to the last page.
    #[must_use]
    pub fn index_at_offset(&self, offset: f32) -> usize {
        if self.is_empty() || offset <= 0.0 {
            return 0;
        }
        let last = self.len() - 1;
        match self {
            Self::Fixed { page_height, .. } => {
                if *page_height <= 0.0 {
                    0
                } else {
                    ((offset / page_height) as usize).min(last)
                }
            }
            Self::Variable { offsets } => {
                // First boundary strictly above `offset` is the end of the
                // containing page.
                let upper = offsets.partition_point(|&o| o <= offset);
                upper.saturating_sub(1).min(last)
            }
        }
    }

    /// Index of the page whose boundary is nearest to `offset`.
    ///
    /// This is the page a drag at rest on `offset` rounds to.
    #[must_use]
    pub fn nearest_index(&self, offset: f32) -> usize {
        if self.is_empty() {
            return 0;
        }
        let index = self.index_at_offset(offset);
        let into = offset - self.offset_of(index);
        if into > self.height_of(index) / 2.0 {
            (index + 1).min(self.len() - 1)
        } else {
            index
        }
    }

    /// Pages intersecting the viewport `[offset, offset + viewport)`, widened
    /// by `overscan` pages on each side and clamped to the window.
    ///
    /// The virtualization window: only these pages need to be resident.
    #[must_use]
    pub fn visible_range(&self, offset: f32, viewport: f32, overscan: usize) -> Range<usize> {
        if self.is_empty() {
            return 0..0;
        }
        let first = self.index_at_offset(offset);
        let last = self.index_at_offset(offset + viewport.max(0.0));
        let start = first.saturating_sub(overscan);
        let end = (last + overscan + 1).min(self.len());
        start..end
    }
}
