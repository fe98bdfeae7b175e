#![forbid(unsafe_code)]

//! In-memory host for deterministic runs.
//!
//! [`SimulatedPage`] is a document with fixed element positions and a
//! scroller that jumps straight to the resting position. [`SimulatedSession`]
//! adds a host-driven clock so the delayed initial sync can be stepped
//! explicitly, the way a browser event loop would fire it.

use core::time::Duration;
use std::collections::BTreeMap;

use crate::config::SyncConfig;
use crate::host::{AnchorHost, ScrollRequest};
use crate::lifecycle::{AnchorSynchronizer, TriggerOutcome};

/// A document with element tops given in document coordinates.
#[derive(Debug, Default, Clone)]
pub struct SimulatedPage {
    hash: String,
    elements: BTreeMap<String, f64>,
    scroll_y: f64,
    max_scroll_y: Option<f64>,
    requests: Vec<ScrollRequest>,
}

impl SimulatedPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>, document_top: f64) -> Self {
        self.elements.insert(id.into(), document_top);
        self
    }

    #[must_use]
    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = hash.into();
        self
    }

    /// Clamp scrolling to `0..=max`, as a finite document would.
    #[must_use]
    pub fn with_max_scroll(mut self, max: f64) -> Self {
        self.max_scroll_y = Some(max.max(0.0));
        self
    }

    pub fn set_hash(&mut self, hash: impl Into<String>) {
        self.hash = hash.into();
    }

    /// Move an element, e.g. to model a late layout shift.
    pub fn set_element(&mut self, id: impl Into<String>, document_top: f64) {
        self.elements.insert(id.into(), document_top);
    }

    /// Scroll without recording a request (user scrolling).
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = self.clamp(y);
    }

    /// Every request received, oldest first.
    #[must_use]
    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    #[must_use]
    pub fn last_request(&self) -> Option<ScrollRequest> {
        self.requests.last().copied()
    }

    fn clamp(&self, y: f64) -> f64 {
        let y = y.max(0.0);
        match self.max_scroll_y {
            Some(max) => y.min(max),
            None => y,
        }
    }
}

impl AnchorHost for SimulatedPage {
    fn location_hash(&self) -> String {
        self.hash.clone()
    }

    fn element_viewport_top(&self, id: &str) -> Option<f64> {
        self.elements.get(id).map(|top| top - self.scroll_y)
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, request: ScrollRequest) {
        self.requests.push(request);
        self.scroll_y = self.clamp(request.top);
    }
}

/// Monotonic clock advanced only by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// A page view: synchronizer, page and clock wired together.
#[derive(Debug, Clone)]
pub struct SimulatedSession {
    sync: AnchorSynchronizer,
    page: SimulatedPage,
    clock: DeterministicClock,
    timers: Vec<Duration>,
}

impl SimulatedSession {
    #[must_use]
    pub fn new(config: SyncConfig, page: SimulatedPage) -> Self {
        Self {
            sync: AnchorSynchronizer::new(config),
            page,
            clock: DeterministicClock::new(),
            timers: Vec::new(),
        }
    }

    /// Deliver structural load completion.
    pub fn load(&mut self) {
        if let Some(delay) = self.sync.on_structural_load() {
            self.timers.push(self.clock.now().saturating_add(delay));
        }
    }

    /// Change the fragment and deliver the fragment-change notification,
    /// as clicking an in-page link does.
    pub fn navigate(&mut self, hash: impl Into<String>) -> TriggerOutcome {
        self.page.set_hash(hash);
        self.sync.on_hash_change(&mut self.page)
    }

    /// Advance time and fire every timer that came due, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<TriggerOutcome> {
        self.clock.advance(dt);
        let now = self.clock.now();
        self.timers.sort_unstable();
        let due = self.timers.partition_point(|deadline| *deadline <= now);
        let fired: Vec<Duration> = self.timers.drain(..due).collect();
        fired
            .iter()
            .map(|_| self.sync.on_initial_timer(&mut self.page))
            .collect()
    }

    /// Detach the synchronizer and drop pending timers.
    pub fn teardown(&mut self) {
        self.timers.clear();
        self.sync.teardown();
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub const fn now(&self) -> Duration {
        self.clock.now()
    }

    #[must_use]
    pub const fn page(&self) -> &SimulatedPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut SimulatedPage {
        &mut self.page
    }

    #[must_use]
    pub const fn synchronizer(&self) -> &AnchorSynchronizer {
        &self.sync
    }
}
