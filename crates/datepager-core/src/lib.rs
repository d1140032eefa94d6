#![forbid(unsafe_code)]

//! Core: timeline window, presence index, and layout for the temporal pager.
//!
//! # Role in the pager
//! `datepager-core` is the pure layer. It owns date math, the fixed window
//! of week/month pages, the O(1) day→has-event index, and the prefix-sum
//! page layout. Nothing here is stateful across calls, reads the clock, or
//! performs I/O; "today" is injected once via [`config::PagerConfig`].
//!
//! # Primary responsibilities
//! - **[`timeline::Timeline`]**: immutable N-page window anchored on today.
//! - **[`presence::EventPresenceIndex`]**: O(1) event-presence lookups.
//! - **[`layout::PageLayout`]**: O(1) page offset/height, virtualized ranges.
//! - **[`config::PagerConfig`]**: construction-time configuration with
//!   clamp-to-safe-default normalization.
//!
//! # How it fits in the system
//! The interactive layer (`datepager`) drives these types from input
//! callbacks: the scroll controller resolves dates to pages through the
//! timeline, converts offsets through the layout, and the renderer queries
//! the presence index per visible cell.

pub mod config;
pub mod daymath;
pub mod layout;
pub mod presence;
pub mod timeline;
