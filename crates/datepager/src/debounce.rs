#![forbid(unsafe_code)]

//! Settle debouncing: coalesces "drag ended" signals into one event.
//!
//! A scrolling surface can report the end of a gesture two ways: a native
//! momentum-end callback (where the platform provides one) and, as a
//! fallback, the scroll stream simply going quiet. [`SettleDebouncer`]
//! coalesces both into exactly one settle per gesture:
//!
//! - every scroll tick restarts a short quiet window (default 150 ms);
//! - [`poll`](SettleDebouncer::poll) fires when the window lapses with no
//!   new tick;
//! - [`on_momentum_end`](SettleDebouncer::on_momentum_end) fires
//!   immediately — whichever comes first wins.
//!
//! # Invariants
//!
//! 1. At most one settle fires per arm/fire cycle; a second settle while
//!    already settled is a no-op.
//! 2. A new tick after a settle re-arms the debouncer (a fresh fling).
//! 3. [`reset`](SettleDebouncer::reset) cancels everything; a torn-down
//!    controller can never receive a late settle.
//!
//! Time is injected as [`Instant`] values, never read from the clock, so
//! every timing path is deterministic under test.

use std::time::{Duration, Instant};

/// Timing configuration for settle detection.
#[derive(Debug, Clone)]
pub struct DebounceConfig {
    /// Quiet window after the last scroll tick before a settle fires
    /// (default: 150 ms).
    pub quiet_window: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_window: Duration::from_millis(150),
        }
    }
}

/// Coalesces momentum-end and quiet-window signals into one settle.
#[derive(Debug, Clone)]
pub struct SettleDebouncer {
    config: DebounceConfig,
    /// Last scroll tick; `None` while disarmed.
    last_tick: Option<Instant>,
}

impl SettleDebouncer {
    /// Create a disarmed debouncer.
    #[must_use]
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            last_tick: None,
        }
    }

    /// Record a scroll tick, arming (or re-arming) the quiet window.
    pub fn on_tick(&mut self, now: Instant) {
        self.last_tick = Some(now);
    }

    /// Explicit momentum-end signal. Returns `true` if this fires the
    /// settle (i.e. the debouncer was armed).
    pub fn on_momentum_end(&mut self, _now: Instant) -> bool {
        if self.last_tick.is_some() {
            self.last_tick = None;
            true
        } else {
            false
        }
    }

    /// Check the quiet window. Returns `true` exactly once when the window
    /// has lapsed with no new tick; call periodically (e.g. on frame tick).
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last_tick {
            Some(last) if now.duration_since(last) >= self.config.quiet_window => {
                self.last_tick = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a settle is pending (armed and not yet fired).
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.last_tick.is_some()
    }

    /// Cancel any pending settle (teardown / gesture abort).
    pub fn reset(&mut self) {
        self.last_tick = None;
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }
}
