#![forbid(unsafe_code)]

//! The assembled pager: timeline, layout, presence, and controller in one.
//!
//! [`TemporalPager`] wires the pure core to the scroll-sync controller and
//! owns the rebuild protocol: a mode switch regenerates the timeline and
//! layout under a fresh generation id and rebinds the controller, so a
//! gesture racing the switch settles against dead coordinates and is
//! discarded instead of producing a wrong selection.
//!
//! Hosts drive it from their input callbacks and apply the returned
//! [`PagerEffect`]s; the pager itself never touches a scroll view, a clock,
//! or a render surface.

use std::ops::Range;
use std::time::Instant;

use chrono::{FixedOffset, NaiveDate};
use datepager_core::config::{PagerConfig, PagerMode};
use datepager_core::layout::PageLayout;
use datepager_core::presence::{EventPresenceIndex, EventSource};
use datepager_core::timeline::{Page, Timeline};

use crate::controller::{PagerEffect, ScrollSyncController, SyncPhase};
use crate::debounce::DebounceConfig;
use crate::render::{self, CellStyler, CellVisual};

/// Default overscan in pages on each side of the viewport.
pub const DEFAULT_OVERSCAN: usize = 1;

/// A virtualized week/month pager over a fixed timeline window.
#[derive(Debug)]
pub struct TemporalPager {
    config: PagerConfig,
    timeline: Timeline,
    layout: PageLayout,
    presence: EventPresenceIndex,
    controller: ScrollSyncController,
    next_generation: u64,
    overscan: usize,
}

impl TemporalPager {
    /// Build a pager from `config`, resting on the page owning `selected`.
    #[must_use]
    pub fn new(config: PagerConfig, selected: NaiveDate) -> Self {
        let config = config.normalized();
        let timeline = Timeline::generate(&config, 0);
        let layout = PageLayout::build(&timeline, &config.metrics);
        let controller =
            ScrollSyncController::new(&timeline, selected, DebounceConfig::default());
        Self {
            config,
            timeline,
            layout,
            presence: EventPresenceIndex::new(),
            controller,
            next_generation: 1,
            overscan: DEFAULT_OVERSCAN,
        }
    }

    /// Set the settle-debounce timing. Takes effect from the next gesture.
    #[must_use]
    pub fn with_debounce(mut self, debounce: DebounceConfig) -> Self {
        self.controller =
            ScrollSyncController::new(&self.timeline, self.controller.selected(), debounce);
        self
    }

    /// Set the virtualization overscan in pages.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    // ---- Accessors -------------------------------------------------------

    /// The generated timeline window.
    #[inline]
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The layout index over the window.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Current controller phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.controller.phase()
    }

    /// The page the pager considers current.
    #[inline]
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.controller.current_page()
    }

    /// The last known selection.
    #[inline]
    #[must_use]
    pub fn selected(&self) -> NaiveDate {
        self.controller.selected()
    }

    /// Current page shape.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> PagerMode {
        self.config.mode
    }

    /// Pixel offset of the top of `index`'s page.
    #[must_use]
    pub fn offset_for_page(&self, index: usize) -> f32 {
        self.layout.offset_of(index)
    }

    // ---- Selection and gestures ------------------------------------------

    /// External selection changed (the caller owns the selected date).
    pub fn select_date(&mut self, date: NaiveDate) -> Vec<PagerEffect> {
        self.controller.select_date(date, &self.timeline, &self.layout)
    }

    /// Host acknowledgment that a programmatic jump has been applied.
    pub fn scroll_completed(&mut self) -> Vec<PagerEffect> {
        self.controller.scroll_completed(&self.timeline, &self.layout)
    }

    /// The user started dragging.
    pub fn begin_drag(&mut self) {
        self.controller.drag_started(&self.timeline);
    }

    /// A scroll position update during a drag.
    pub fn drag_tick(&mut self, offset: f32, now: Instant) {
        self.controller.drag_tick(offset, now);
    }

    /// Native momentum-end signal for the active drag.
    pub fn end_drag(&mut self, offset: f32, now: Instant) -> Vec<PagerEffect> {
        self.controller
            .momentum_ended(offset, now, &self.timeline, &self.layout)
    }

    /// Periodic tick for the quiet-window settle fallback.
    pub fn poll(&mut self, now: Instant) -> Vec<PagerEffect> {
        self.controller.poll(now, &self.timeline, &self.layout)
    }

    /// Direct tap on a day cell.
    pub fn tap(&mut self, date: NaiveDate) -> Vec<PagerEffect> {
        self.controller.tap(date, &self.timeline, &self.layout)
    }

    /// Cancel pending gestures and in-flight jumps (teardown, backgrounding).
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    // ---- Events ----------------------------------------------------------

    /// Replace the event set, normalizing starts to UTC calendar days.
    pub fn set_events<I, E>(&mut self, events: I)
    where
        I: IntoIterator<Item = E>,
        E: EventSource,
    {
        self.presence = EventPresenceIndex::build(events);
    }

    /// Replace the event set, normalizing starts to days in `offset`.
    pub fn set_events_with_offset<I, E>(&mut self, events: I, offset: FixedOffset)
    where
        I: IntoIterator<Item = E>,
        E: EventSource,
    {
        self.presence = EventPresenceIndex::build_with_offset(events, offset);
    }

    /// The active presence index.
    #[inline]
    #[must_use]
    pub fn presence(&self) -> &EventPresenceIndex {
        &self.presence
    }

    // ---- Mode switching --------------------------------------------------

    /// Switch between week and month pages.
    ///
    /// Regenerates the timeline and layout under a fresh generation id and
    /// rebinds the controller; a settle from a gesture that started before
    /// the switch is detected as stale and discarded. No-op if `mode` is
    /// already active.
    pub fn set_mode(&mut self, mode: PagerMode) {
        if mode == self.config.mode {
            return;
        }
        self.config.mode = mode;
        let generation = self.next_generation;
        self.next_generation += 1;
        self.timeline = Timeline::generate(&self.config, generation);
        self.layout = PageLayout::build(&self.timeline, &self.config.metrics);
        self.controller.rebind(&self.timeline);
    }

    // ---- Virtualization and rendering ------------------------------------

    /// Page indices that must be resident for the viewport at `offset`.
    #[must_use]
    pub fn visible_range(&self, offset: f32, viewport: f32) -> Range<usize> {
        self.layout.visible_range(offset, viewport, self.overscan)
    }

    /// Pages that must be resident for the viewport at `offset`.
    pub fn visible_pages(&self, offset: f32, viewport: f32) -> impl Iterator<Item = &Page> {
        let range = self.visible_range(offset, viewport);
        self.timeline.pages()[range].iter()
    }

    /// Render the page at `index` against the current selection and events.
    ///
    /// Returns `None` if `index` is out of range.
    #[must_use]
    pub fn render_page(&self, index: usize) -> Option<Vec<CellVisual>> {
        let page = self.timeline.page(index)?;
        Some(render::render_page(
            page,
            Some(self.controller.selected()),
            &self.presence,
        ))
    }

    /// Render the page at `index`, resolving styles through `styler`.
    #[must_use]
    pub fn render_page_styled<S: CellStyler>(
        &self,
        index: usize,
        styler: &S,
    ) -> Option<Vec<(CellVisual, S::Style)>> {
        let page = self.timeline.page(index)?;
        Some(render::render_page_styled(
            page,
            Some(self.controller.selected()),
            &self.presence,
            styler,
        ))
    }
}
