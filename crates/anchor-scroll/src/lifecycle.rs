#![forbid(unsafe_code)]

//! Trigger policy for the synchronizer.
//!
//! Two independent host notifications drive a pass:
//!
//! - **Structural load** (once per page view): the synchronizer moves from
//!   [`SyncPhase::AwaitingFirstPaint`] to [`SyncPhase::Listening`] and hands the
//!   host a delay. When that delay elapses the host calls
//!   [`AnchorSynchronizer::on_initial_timer`]. Layout may still be settling
//!   right after parsing, so geometry is sampled late.
//! - **Fragment change** (any number of times): a pass runs immediately.
//!
//! Nothing is coalesced or cancelled. A fragment change inside the initial
//! delay window yields two independent scroll requests and the host's
//! scroller decides the resting position.
//!
//! [`AnchorSynchronizer::teardown`] detaches the instance; every later
//! trigger is ignored.

use core::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::SyncConfig;
use crate::host::AnchorHost;
use crate::sync::{SyncOutcome, sync_to_anchor_with};
use crate::trace::{SyncTrace, Trigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    AwaitingFirstPaint,
    Listening,
    Detached,
}

/// Why a trigger did not run a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// Structural load was already handled for this page view.
    AlreadyLoaded,
    /// The initial timer fired without a matching structural load.
    NotScheduled,
    /// The synchronizer was torn down.
    Detached,
}

/// Result of handing one trigger to the synchronizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum TriggerOutcome {
    /// The host must call `on_initial_timer` after `delay_ms`.
    Scheduled { delay_ms: u64 },
    Synced(SyncOutcome),
    Ignored { reason: IgnoredReason },
    Detached,
}

/// Counters over the synchronizer's lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub scheduled: u64,
    pub passes: u64,
    pub scrolls: u64,
    pub no_fragment: u64,
    pub missing_element: u64,
    pub ignored: u64,
}

#[derive(Debug, Clone)]
pub struct AnchorSynchronizer {
    config: SyncConfig,
    phase: SyncPhase,
    initial_pending: bool,
    stats: SyncStats,
    trace: SyncTrace,
}

impl Default for AnchorSynchronizer {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

impl AnchorSynchronizer {
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            phase: SyncPhase::AwaitingFirstPaint,
            initial_pending: false,
            stats: SyncStats::default(),
            trace: SyncTrace::default(),
        }
    }

    /// Replace the default trace buffer (e.g. with a larger one).
    #[must_use]
    pub fn with_trace(mut self, trace: SyncTrace) -> Self {
        self.trace = trace;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[must_use]
    pub const fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[must_use]
    pub const fn stats(&self) -> SyncStats {
        self.stats
    }

    #[must_use]
    pub const fn trace(&self) -> &SyncTrace {
        &self.trace
    }

    /// Whether an initial timer is outstanding.
    #[must_use]
    pub const fn initial_pending(&self) -> bool {
        self.initial_pending
    }

    /// Structural load completed. Returns the delay after which the host
    /// must call [`Self::on_initial_timer`], or `None` if nothing is due.
    pub fn on_structural_load(&mut self) -> Option<Duration> {
        match self.phase {
            SyncPhase::AwaitingFirstPaint => {
                let delay = self.config.initial_delay();
                self.phase = SyncPhase::Listening;
                self.initial_pending = true;
                self.stats.scheduled += 1;
                debug!(delay_ms = self.config.initial_delay_ms, "initial anchor sync scheduled");
                self.trace.push(
                    Trigger::StructuralLoad,
                    TriggerOutcome::Scheduled {
                        delay_ms: self.config.initial_delay_ms,
                    },
                );
                Some(delay)
            }
            SyncPhase::Listening => {
                warn!("structural load reported twice; ignoring");
                self.ignore(Trigger::StructuralLoad, IgnoredReason::AlreadyLoaded);
                None
            }
            SyncPhase::Detached => {
                self.ignore(Trigger::StructuralLoad, IgnoredReason::Detached);
                None
            }
        }
    }

    /// The delay returned by [`Self::on_structural_load`] elapsed.
    pub fn on_initial_timer<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        if self.phase == SyncPhase::Detached {
            return self.ignore(Trigger::InitialTimer, IgnoredReason::Detached);
        }
        if !self.initial_pending {
            return self.ignore(Trigger::InitialTimer, IgnoredReason::NotScheduled);
        }
        self.initial_pending = false;
        self.pass(Trigger::InitialTimer, host)
    }

    /// The URL fragment changed. Runs a pass synchronously.
    pub fn on_hash_change<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        if self.phase == SyncPhase::Detached {
            return self.ignore(Trigger::HashChange, IgnoredReason::Detached);
        }
        self.pass(Trigger::HashChange, host)
    }

    /// Embedder-requested pass, independent of the two host triggers.
    pub fn sync_now<H: AnchorHost + ?Sized>(&mut self, host: &mut H) -> TriggerOutcome {
        if self.phase == SyncPhase::Detached {
            return self.ignore(Trigger::Manual, IgnoredReason::Detached);
        }
        self.pass(Trigger::Manual, host)
    }

    /// Detach from the host. Idempotent.
    pub fn teardown(&mut self) {
        if self.phase == SyncPhase::Detached {
            return;
        }
        debug!(initial_pending = self.initial_pending, "anchor synchronizer detached");
        self.phase = SyncPhase::Detached;
        self.initial_pending = false;
        self.trace.push(Trigger::Teardown, TriggerOutcome::Detached);
    }

    fn pass<H: AnchorHost + ?Sized>(&mut self, trigger: Trigger, host: &mut H) -> TriggerOutcome {
        let outcome = sync_to_anchor_with(host, self.config.offset_px, self.config.behavior);
        self.stats.passes += 1;
        match outcome {
            SyncOutcome::NoFragment => self.stats.no_fragment += 1,
            SyncOutcome::MissingElement { .. } => self.stats.missing_element += 1,
            SyncOutcome::Scrolled { .. } => self.stats.scrolls += 1,
        }
        let result = TriggerOutcome::Synced(outcome);
        self.trace.push(trigger, result.clone());
        result
    }

    fn ignore(&mut self, trigger: Trigger, reason: IgnoredReason) -> TriggerOutcome {
        self.stats.ignored += 1;
        let result = TriggerOutcome::Ignored { reason };
        self.trace.push(trigger, result.clone());
        result
    }
}
