#![forbid(unsafe_code)]

//! Pure page rendering: page + selection + presence → cell visuals.
//!
//! Rendering a page is a pure function of three inputs: the page's cells,
//! the selected date, and the event-presence index. The output carries no
//! colors or geometry of its own; hosts map [`CellFlags`] to their own
//! styling through [`CellStyler`]. Because nothing here is cached, a
//! selection change re-renders correctly for free and the visuals can never
//! drift out of sync with the timeline.

use bitflags::bitflags;
use chrono::{Datelike, NaiveDate};
use datepager_core::presence::EventPresenceIndex;
use datepager_core::timeline::Page;

bitflags! {
    /// Visual states of a day cell. States compose: today can be selected,
    /// a faded filler day can carry an event dot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        /// The selected date.
        const SELECTED = 1 << 0;
        /// Leading/trailing filler day from an adjacent month.
        const FADED = 1 << 1;
        /// The injected "today".
        const TODAY = 1 << 2;
        /// At least one event starts on this day.
        const EVENT = 1 << 3;
    }
}

/// One rendered day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVisual {
    /// The calendar day.
    pub date: NaiveDate,
    /// Display text (the day number).
    pub text: String,
    /// Composed visual states.
    pub flags: CellFlags,
}

/// Maps composed cell flags to a host-specific style.
///
/// The pager stays agnostic of the rendering backend; a TUI host maps
/// flags to terminal attributes, a GUI host to colors and fonts.
pub trait CellStyler {
    /// Host style type.
    type Style;

    /// Resolve the style for one cell's flag set.
    fn style(&self, flags: CellFlags) -> Self::Style;
}

/// Render one page's cells.
///
/// Filler cells render faded but keep their real date, so they stay
/// tappable. Selection matches at most one cell per page by date equality;
/// a selection on another page simply matches nothing.
#[must_use]
pub fn render_page(
    page: &Page,
    selected: Option<NaiveDate>,
    presence: &EventPresenceIndex,
) -> Vec<CellVisual> {
    page.cells
        .iter()
        .map(|cell| {
            let mut flags = CellFlags::empty();
            if selected == Some(cell.date) {
                flags |= CellFlags::SELECTED;
            }
            if !cell.in_current_page {
                flags |= CellFlags::FADED;
            }
            if cell.is_today {
                flags |= CellFlags::TODAY;
            }
            if presence.has_event(cell.date) {
                flags |= CellFlags::EVENT;
            }
            CellVisual {
                date: cell.date,
                text: cell.date.day().to_string(),
                flags,
            }
        })
        .collect()
}

/// Render one page and resolve each cell's style through `styler`.
#[must_use]
pub fn render_page_styled<S: CellStyler>(
    page: &Page,
    selected: Option<NaiveDate>,
    presence: &EventPresenceIndex,
    styler: &S,
) -> Vec<(CellVisual, S::Style)> {
    render_page(page, selected, presence)
        .into_iter()
        .map(|visual| {
            let style = styler.style(visual.flags);
            (visual, style)
        })
        .collect()
}
