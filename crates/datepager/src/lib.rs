#![forbid(unsafe_code)]

//! Interactive layer of the temporal pager.
//!
//! # Role in the pager
//! `datepager` sits on top of `datepager-core` and owns everything stateful:
//! the scroll-sync state machine, settle debouncing, pure page rendering,
//! and the [`pager::TemporalPager`] facade that wires them together.
//!
//! # Primary responsibilities
//! - **[`controller::ScrollSyncController`]**: reconciles programmatic
//!   selection jumps with user drags without feedback loops.
//! - **[`debounce::SettleDebouncer`]**: coalesces momentum-end and
//!   quiet-window signals into one settle per gesture.
//! - **[`render`]**: pure page → cell-visual mapping with composable flags.
//! - **[`pager::TemporalPager`]**: the assembled pager with the mode-switch
//!   rebuild protocol.
//!
//! # Design notes
//! All entry points take the current time as an [`std::time::Instant`] and
//! return effects as values ([`controller::PagerEffect`]); nothing here
//! reads a clock, spawns a timer, or invokes a callback, so every scenario
//! down to gesture/switch races is testable deterministically.

pub mod controller;
pub mod debounce;
pub mod pager;
pub mod render;

pub use controller::{PagerEffect, ScrollSyncController, SyncPhase};
pub use debounce::{DebounceConfig, SettleDebouncer};
pub use pager::TemporalPager;
pub use render::{CellFlags, CellStyler, CellVisual, render_page, render_page_styled};
