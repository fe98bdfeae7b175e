#![forbid(unsafe_code)]

//! Platform-independent part of the browser binding.
//!
//! Holds the synchronizer plus the bookkeeping the wasm side needs for its
//! single `setTimeout` handle. No JS/WASM types here, so native tests can
//! drive it with a simulated page.

use core::time::Duration;

use anchor_scroll::config::Result as ConfigResult;
use anchor_scroll::{AnchorHost, AnchorSynchronizer, SyncConfig, TriggerOutcome};
use tracing::debug;

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentReadyState {
    Loading,
    Interactive,
    Complete,
}

impl DocumentReadyState {
    /// Unknown values are treated as still loading so that the
    /// `DOMContentLoaded` listener stays in charge.
    #[must_use]
    pub fn parse(state: &str) -> Self {
        match state {
            "interactive" => Self::Interactive,
            "complete" => Self::Complete,
            _ => Self::Loading,
        }
    }

    /// Whether `DOMContentLoaded` has already been dispatched.
    #[must_use]
    pub const fn structure_loaded(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// `setTimeout` takes an `i32` millisecond count.
#[must_use]
pub fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}

#[derive(Debug)]
pub struct BindingCore {
    sync: AnchorSynchronizer,
    timer: Option<i32>,
}

impl BindingCore {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            sync: AnchorSynchronizer::new(config),
            timer: None,
        }
    }

    /// Build from the optional JSON options object passed by JS.
    pub fn from_config_json(json: Option<&str>) -> ConfigResult<Self> {
        let config = match json {
            Some(json) if !json.trim().is_empty() => SyncConfig::from_json(json)?,
            _ => SyncConfig::default(),
        };
        Ok(Self::new(config))
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &AnchorSynchronizer {
        &self.sync
    }

    /// Handle of the outstanding initial timer, if armed.
    #[must_use]
    pub const fn timer(&self) -> Option<i32> {
        self.timer
    }

    /// Structural load fired. Returns the timeout to arm, in milliseconds.
    pub fn structural_load(&mut self) -> Option<i32> {
        self.sync.on_structural_load().map(timeout_millis)
    }

    pub fn arm_timer(&mut self, handle: i32) {
        debug!(handle, "initial anchor sync timer armed");
        self.timer = Some(handle);
    }

    pub fn fire_timer<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        self.timer = None;
        self.sync.on_initial_timer(host)
    }

    pub fn hash_change<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        self.sync.on_hash_change(host)
    }

    pub fn sync_now<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        self.sync.sync_now(host)
    }

    /// Tear down. Returns the timer handle the caller must clear.
    pub fn detach(&mut self) -> Option<i32> {
        self.sync.teardown();
        self.timer.take()
    }

    pub fn trace_jsonl(&self) -> String {
        self.sync.trace().to_jsonl().unwrap_or_default()
    }
}
