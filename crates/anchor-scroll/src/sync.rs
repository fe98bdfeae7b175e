#![forbid(unsafe_code)]

//! One synchronization pass: fragment → element → scroll request.

use serde::Serialize;
use tracing::{debug, trace};

use crate::fragment::anchor_id;
use crate::host::{AnchorHost, ScrollBehavior, ScrollRequest};

/// What a single pass did. Informational only; no variant is a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The location has no fragment.
    NoFragment,
    /// No element carries the fragment's identifier.
    MissingElement { id: String },
    /// A scroll request was issued.
    Scrolled { id: String, request: ScrollRequest },
}

impl SyncOutcome {
    /// The request handed to the host, if any.
    #[must_use]
    pub fn request(&self) -> Option<ScrollRequest> {
        match self {
            Self::Scrolled { request, .. } => Some(*request),
            _ => None,
        }
    }

    #[must_use]
    pub const fn scrolled(&self) -> bool {
        matches!(self, Self::Scrolled { .. })
    }
}

/// Document-relative target for an element measured at `viewport_top` while
/// the page is scrolled by `scroll_y`, minus `offset`.
///
/// Negative results are returned as-is; the host clamps.
#[must_use]
pub fn scroll_target(viewport_top: f64, scroll_y: f64, offset: f64) -> f64 {
    viewport_top + scroll_y - offset
}

/// Smooth-scroll so the fragment's element sits `offset` pixels below the top
/// of the viewport.
pub fn sync_to_anchor<H: AnchorHost + ?Sized>(host: &mut H, offset: f64) -> SyncOutcome {
    sync_to_anchor_with(host, offset, ScrollBehavior::Smooth)
}

/// [`sync_to_anchor`] with an explicit transition mode.
pub fn sync_to_anchor_with<H: AnchorHost + ?Sized>(
    host: &mut H,
    offset: f64,
    behavior: ScrollBehavior,
) -> SyncOutcome {
    let hash = host.location_hash();
    let Some(id) = anchor_id(&hash) else {
        trace!("anchor sync skipped: no fragment");
        return SyncOutcome::NoFragment;
    };
    let Some(viewport_top) = host.element_viewport_top(id) else {
        debug!(id, "anchor sync skipped: no element with fragment id");
        return SyncOutcome::MissingElement { id: id.to_owned() };
    };

    let top = scroll_target(viewport_top, host.scroll_y(), offset);
    let request = ScrollRequest { top, behavior };
    debug!(id, top, behavior = behavior.as_str(), "anchor sync scrolling");
    host.scroll_to(request);
    SyncOutcome::Scrolled {
        id: id.to_owned(),
        request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimulatedPage;

    use pretty_assertions::assert_eq;

    #[test]
    fn section_at_800_with_120_offset_targets_680() {
        let mut page = SimulatedPage::new()
            .with_element("section2", 800.0)
            .with_hash("#section2");
        let outcome = sync_to_anchor(&mut page, 120.0);
        assert_eq!(
            outcome.request(),
            Some(ScrollRequest {
                top: 680.0,
                behavior: ScrollBehavior::Smooth,
            })
        );
        assert_eq!(page.requests(), &[outcome.request().unwrap()]);
    }

    #[test]
    fn target_is_invariant_to_prior_scroll() {
        let mut page = SimulatedPage::new()
            .with_element("section2", 800.0)
            .with_hash("#section2");
        page.set_scroll_y(300.0);
        assert_eq!(page.element_viewport_top("section2"), Some(500.0));

        let outcome = sync_to_anchor(&mut page, 120.0);
        assert_eq!(outcome.request().map(|r| r.top), Some(680.0));
    }

    #[test]
    fn no_fragment_issues_nothing() {
        let mut page = SimulatedPage::new().with_element("section2", 800.0);
        assert_eq!(sync_to_anchor(&mut page, 120.0), SyncOutcome::NoFragment);
        assert!(page.requests().is_empty());
        assert_eq!(page.scroll_y(), 0.0);
    }

    #[test]
    fn unknown_id_issues_nothing() {
        let mut page = SimulatedPage::new()
            .with_element("section2", 800.0)
            .with_hash("#ghost");
        assert_eq!(
            sync_to_anchor(&mut page, 120.0),
            SyncOutcome::MissingElement {
                id: "ghost".to_owned()
            }
        );
        assert!(page.requests().is_empty());
    }

    #[test]
    fn element_near_top_yields_negative_target() {
        let mut page = SimulatedPage::new()
            .with_element("intro", 40.0)
            .with_hash("#intro");
        let outcome = sync_to_anchor(&mut page, 120.0);
        assert_eq!(outcome.request().map(|r| r.top), Some(-80.0));
    }

    #[test]
    fn explicit_behavior_is_forwarded() {
        let mut page = SimulatedPage::new()
            .with_element("a", 10.0)
            .with_hash("#a");
        let outcome = sync_to_anchor_with(&mut page, 0.0, ScrollBehavior::Instant);
        assert_eq!(
            outcome.request().map(|r| r.behavior),
            Some(ScrollBehavior::Instant)
        );
    }
}
