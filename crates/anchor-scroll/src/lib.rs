#![forbid(unsafe_code)]

//! `anchor-scroll` aligns the viewport with the element named by the URL
//! fragment, leaving room for a fixed header.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment (a browser binding or a
//!   test harness) implements [`AnchorHost`] and forwards the two triggers.
//! - **Deterministic time**: the initial delayed sync is returned to the host
//!   as a [`Duration`]; the host owns the timer.
//! - **No failures**: a missing fragment or a missing element is a no-op and
//!   is only reported through [`SyncOutcome`].
//!
//! The `wasm-bindgen` surface lives in the `anchor-scroll-web` crate.

pub mod config;
pub mod fragment;
pub mod host;
pub mod lifecycle;
pub mod sim;
pub mod sync;
pub mod trace;

pub use config::{ConfigError, SyncConfig};
pub use fragment::anchor_id;
pub use host::{AnchorHost, ScrollBehavior, ScrollRequest};
pub use lifecycle::{AnchorSynchronizer, IgnoredReason, SyncPhase, SyncStats, TriggerOutcome};
pub use sync::{SyncOutcome, scroll_target, sync_to_anchor};
pub use trace::{SyncTrace, TraceRecord, Trigger};

use core::time::Duration;

/// Vertical space reserved for the sticky header, in layout pixels.
pub const DEFAULT_OFFSET_PX: f64 = 120.0;

/// Wait between structural load completion and the first sync.
pub const INITIAL_SYNC_DELAY: Duration = Duration::from_millis(100);
