#![forbid(unsafe_code)]

//! Scroll/selection synchronization state machine.
//!
//! [`ScrollSyncController`] reconciles two owners that must never fight:
//! the caller owns the selected date (controlled-component contract), the
//! controller owns the current scroll page. Naive prop-watching — re-issue
//! a scroll whenever the selected date changes — re-enters itself: jump →
//! settle → reselect → jump, and fights the user's finger mid-swipe. The
//! explicit phase machine plus the in-flight equality guard is the entire
//! point of this module.
//!
//! # State Machine
//!
//! ```text
//!            select_date (other page)
//!   Idle ───────────────────────────────► ProgrammaticScrollInFlight
//!    ▲  ◄──────────────────────────────────────────┘
//!    │            scroll_completed
//!    │ drag_started
//!    ▼
//!   UserDragging ──settle──► Idle (+ ReportSelection if the page changed)
//! ```
//!
//! # Invariants
//!
//! 1. `current_page` is always a valid index into the bound timeline.
//! 2. Jumps are always un-animated; a long-distance animated jump (e.g.
//!    "today" from three years away) is jarring, so no animated variant
//!    exists at all.
//! 3. While not `Idle`, an external selection matching the in-flight target
//!    is ignored; a non-matching one is queued and applied on return to
//!    `Idle`. Selecting the same date twice issues exactly one jump.
//! 4. Re-injecting the date reported by a settle never produces a jump:
//!    its page already equals `current_page`.
//! 5. Effects are returned as values, never delivered through callbacks, so
//!    a settle handler that immediately feeds a selection back in is
//!    serialized, not re-entrant.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Target date outside the window | Clamp to the boundary page, report the clamped date |
//! | Settle from a regenerated timeline | Discarded as stale (generation mismatch) |
//! | `scroll_completed` with nothing in flight | Ignored |
//! | Momentum-end before any drag tick | Settles immediately at the reported offset |
//! | Tap while not `Idle` | Queued; replayed as a tap on return to `Idle` |

use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use datepager_core::config::PagerMode;
use datepager_core::daymath;
use datepager_core::layout::PageLayout;
use datepager_core::timeline::Timeline;

use crate::debounce::{DebounceConfig, SettleDebouncer};

/// Imperative effect the host must apply.
///
/// Returned from controller entry points; the host applies jumps to its
/// scroll view and forwards selections to the selection owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PagerEffect {
    /// Scroll, without animation, so that the page at `index` is at rest.
    JumpToPage {
        /// Target page index.
        index: usize,
        /// Precomputed pixel offset of the page top.
        offset: f32,
    },
    /// Propose a new selected date to the selection owner.
    ReportSelection(NaiveDate),
}

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Nothing in motion.
    Idle,
    /// The user's finger (or momentum) owns the scroll position.
    UserDragging,
    /// A programmatic un-animated jump has been issued and not yet acked.
    ProgrammaticScrollInFlight,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    target_page: usize,
    target_date: NaiveDate,
}

/// Input received while not `Idle`, replayed on return to `Idle`.
///
/// The kind matters on replay: a selection on the current page is quiet,
/// but a tap must always report the tapped date.
#[derive(Debug, Clone, Copy)]
enum PendingInput {
    Select(NaiveDate),
    Tap(NaiveDate),
}

/// The scroll-sync state machine.
///
/// The controller never owns the timeline or layout; entry points borrow
/// them so a mode switch can rebuild both and [`rebind`] the controller
/// without tearing it down.
///
/// [`rebind`]: ScrollSyncController::rebind
#[derive(Debug)]
pub struct ScrollSyncController {
    phase: SyncPhase,
    current_page: usize,
    /// Mirror of the caller-owned selection, used to derive same-offset
    /// dates on settle. The caller remains the owner; this is only ever
    /// written from caller input or from values we reported upward.
    selected: NaiveDate,
    debouncer: SettleDebouncer,
    in_flight: Option<InFlight>,
    /// Non-matching input received while not `Idle`.
    pending: Option<PendingInput>,
    last_offset: f32,
    /// Generation of the timeline this controller is bound to.
    generation: u64,
    /// Generation captured when the active drag began.
    drag_generation: u64,
}

impl ScrollSyncController {
    /// Create a controller bound to `timeline`, resting on the page owning
    /// `selected` (clamped into the window if outside).
    #[must_use]
    pub fn new(timeline: &Timeline, selected: NaiveDate, debounce: DebounceConfig) -> Self {
        let (current_page, _) = timeline.page_for_date_clamped(selected);
        Self {
            phase: SyncPhase::Idle,
            current_page,
            selected,
            debouncer: SettleDebouncer::new(debounce),
            in_flight: None,
            pending: None,
            last_offset: 0.0,
            generation: timeline.generation(),
            drag_generation: timeline.generation(),
        }
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Page the controller considers current.
    #[inline]
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Mirror of the last known selection.
    #[inline]
    #[must_use]
    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Rebind after the timeline was regenerated (mode switch).
    ///
    /// Cancels any in-flight jump, pending selection, and armed settle; the
    /// current page is re-resolved from the selection mirror against the
    /// new window.
    pub fn rebind(&mut self, timeline: &Timeline) {
        self.generation = timeline.generation();
        self.drag_generation = timeline.generation();
        self.phase = SyncPhase::Idle;
        self.in_flight = None;
        self.pending = None;
        self.debouncer.reset();
        let (page, _) = timeline.page_for_date_clamped(self.selected);
        self.current_page = page;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            generation = self.generation,
            current_page = self.current_page,
            "controller rebound to new timeline"
        );
    }

    /// External (caller-owned) selection changed.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        timeline: &Timeline,
        layout: &PageLayout,
    ) -> Vec<PagerEffect> {
        if self.phase != SyncPhase::Idle {
            if self
                .in_flight
                .is_some_and(|in_flight| in_flight.target_date == date)
            {
                // The echo of our own in-flight jump. Ignoring it is what
                // breaks the jump→reselect→rejump loop.
                #[cfg(feature = "tracing")]
                tracing::trace!(%date, "ignoring selection matching in-flight target");
                return Vec::new();
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(%date, "queueing selection until idle");
            self.pending = Some(PendingInput::Select(date));
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(2);
        let (page, clamped) = timeline.page_for_date_clamped(date);
        let effective = if clamped {
            let substitute = derive_date_on_page(timeline, page, date);
            #[cfg(feature = "tracing")]
            tracing::debug!(requested = %date, clamped = %substitute, "selection outside window");
            effects.push(PagerEffect::ReportSelection(substitute));
            substitute
        } else {
            date
        };
        self.selected = effective;

        if page != self.current_page {
            self.phase = SyncPhase::ProgrammaticScrollInFlight;
            self.in_flight = Some(InFlight {
                target_page: page,
                target_date: effective,
            });
            effects.push(PagerEffect::JumpToPage {
                index: page,
                offset: layout.offset_of(page),
            });
        }
        effects
    }

    /// Host acknowledgment that the programmatic jump has been applied.
    pub fn scroll_completed(
        &mut self,
        timeline: &Timeline,
        layout: &PageLayout,
    ) -> Vec<PagerEffect> {
        if self.phase != SyncPhase::ProgrammaticScrollInFlight {
            return Vec::new();
        }
        if let Some(in_flight) = self.in_flight.take() {
            self.current_page = in_flight.target_page;
        }
        self.phase = SyncPhase::Idle;
        self.drain_pending(timeline, layout)
    }

    /// The user started dragging. Discards any in-flight jump: the finger
    /// wins.
    pub fn drag_started(&mut self, timeline: &Timeline) {
        self.in_flight = None;
        self.phase = SyncPhase::UserDragging;
        self.drag_generation = timeline.generation();
        self.debouncer.reset();
    }

    /// A scroll tick during a drag; re-arms the settle window.
    pub fn drag_tick(&mut self, offset: f32, now: Instant) {
        if self.phase != SyncPhase::UserDragging {
            return;
        }
        self.last_offset = offset;
        self.debouncer.on_tick(now);
    }

    /// Native momentum-end signal.
    ///
    /// Settles even when no drag tick preceded it: a short fling can end
    /// before its first scroll tick arrives, and the gesture must still
    /// resolve rather than leave the controller in `UserDragging`.
    pub fn momentum_ended(
        &mut self,
        offset: f32,
        now: Instant,
        timeline: &Timeline,
        layout: &PageLayout,
    ) -> Vec<PagerEffect> {
        if self.phase != SyncPhase::UserDragging {
            return Vec::new();
        }
        self.last_offset = offset;
        self.debouncer.on_momentum_end(now);
        self.settle(timeline, layout)
    }

    /// Periodic check for the quiet-window settle fallback.
    pub fn poll(
        &mut self,
        now: Instant,
        timeline: &Timeline,
        layout: &PageLayout,
    ) -> Vec<PagerEffect> {
        if self.phase == SyncPhase::UserDragging && self.debouncer.poll(now) {
            self.settle(timeline, layout)
        } else {
            Vec::new()
        }
    }

    /// Direct cell tap: an `Idle`→`Idle` shortcut.
    ///
    /// Tapping a leading/trailing filler cell navigates to the page that
    /// owns the date. Off-window taps clamp to the boundary page.
    pub fn tap(
        &mut self,
        date: NaiveDate,
        timeline: &Timeline,
        layout: &PageLayout,
    ) -> Vec<PagerEffect> {
        if self.phase != SyncPhase::Idle {
            self.pending = Some(PendingInput::Tap(date));
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(2);
        let (page, clamped) = timeline.page_for_date_clamped(date);
        let effective = if clamped {
            derive_date_on_page(timeline, page, date)
        } else {
            date
        };
        if page != self.current_page {
            effects.push(PagerEffect::JumpToPage {
                index: page,
                offset: layout.offset_of(page),
            });
            self.current_page = page;
        }
        self.selected = effective;
        effects.push(PagerEffect::ReportSelection(effective));
        effects
    }

    /// Teardown: cancel pending timers and discard in-flight state.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Idle;
        self.in_flight = None;
        self.pending = None;
        self.debouncer.reset();
    }

    fn settle(&mut self, timeline: &Timeline, layout: &PageLayout) -> Vec<PagerEffect> {
        self.phase = SyncPhase::Idle;

        if self.drag_generation != timeline.generation() {
            // The window was regenerated mid-gesture; the offset belongs to
            // a dead coordinate space.
            #[cfg(feature = "tracing")]
            tracing::debug!(
                drag_generation = self.drag_generation,
                generation = timeline.generation(),
                "discarding stale settle"
            );
            return self.drain_pending(timeline, layout);
        }

        let resting = layout.nearest_index(self.last_offset);
        let mut effects = Vec::with_capacity(2);
        if resting != self.current_page {
            let derived = derive_date_on_page(timeline, resting, self.selected);
            self.current_page = resting;
            self.selected = derived;
            effects.push(PagerEffect::ReportSelection(derived));
            #[cfg(feature = "tracing")]
            tracing::debug!(page = resting, selected = %derived, "drag settled on new page");
        }
        effects.extend(self.drain_pending(timeline, layout));
        effects
    }

    fn drain_pending(&mut self, timeline: &Timeline, layout: &PageLayout) -> Vec<PagerEffect> {
        match self.pending.take() {
            Some(PendingInput::Select(date)) => self.select_date(date, timeline, layout),
            Some(PendingInput::Tap(date)) => self.tap(date, timeline, layout),
            None => Vec::new(),
        }
    }
}

/// Derive the date on page `index` that preserves `reference`'s within-page
/// offset: same weekday slot in week mode, same day-of-month clamped into
/// the month's length in month mode.
fn derive_date_on_page(timeline: &Timeline, index: usize, reference: NaiveDate) -> NaiveDate {
    let Some(page) = timeline.page(index) else {
        return reference;
    };
    match timeline.mode() {
        PagerMode::Week => {
            let slot = daymath::weekday_slot(reference, timeline.first_day_of_week());
            daymath::add_days(page.anchor, i64::from(slot))
        }
        PagerMode::Month => daymath::clamp_day_of_month(page.anchor, reference.day()),
    }
}
