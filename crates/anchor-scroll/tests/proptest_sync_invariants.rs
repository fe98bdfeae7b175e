#![forbid(unsafe_code)]

//! Property-based invariant tests for anchor synchronization.
//!
//! 1. No fragment → no scroll request, scroll position untouched
//! 2. Unknown identifier → no scroll request
//! 3. Target is exactly document top minus offset, whatever the prior scroll
//! 4. Repeating a pass with nothing changed yields the same target
//! 5. Every fragment change after load runs exactly one pass, undelayed

use core::time::Duration;

use anchor_scroll::sim::{SimulatedPage, SimulatedSession};
use anchor_scroll::{
    AnchorHost, SyncConfig, SyncOutcome, TriggerOutcome, scroll_target, sync_to_anchor,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

// Integral pixel values keep the float arithmetic exact.
fn px(max: u32) -> impl Strategy<Value = f64> {
    (0..=max).prop_map(f64::from)
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,11}"
}

fn page_strategy() -> impl Strategy<Value = (Vec<(String, f64)>, f64)> {
    (prop::collection::vec((ident(), px(100_000)), 0..12), px(50_000))
}

fn build_page(elements: &[(String, f64)], scroll_y: f64) -> SimulatedPage {
    let mut page = elements
        .iter()
        .fold(SimulatedPage::new(), |page, (id, top)| {
            page.with_element(id.clone(), *top)
        });
    page.set_scroll_y(scroll_y);
    page
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn empty_fragment_is_a_no_op(
        (elements, scroll_y) in page_strategy(),
        hash in prop_oneof![Just(String::new()), Just("#".to_owned())],
        offset in px(500),
    ) {
        let mut page = build_page(&elements, scroll_y).with_hash(hash);
        prop_assert_eq!(sync_to_anchor(&mut page, offset), SyncOutcome::NoFragment);
        prop_assert!(page.requests().is_empty());
        prop_assert_eq!(page.scroll_y(), scroll_y);
    }

    #[test]
    fn missing_element_is_a_no_op(
        (elements, scroll_y) in page_strategy(),
        id in ident(),
        offset in px(500),
    ) {
        prop_assume!(elements.iter().all(|(known, _)| *known != id));
        let mut page = build_page(&elements, scroll_y).with_hash(format!("#{id}"));
        let outcome = sync_to_anchor(&mut page, offset);
        prop_assert_eq!(outcome, SyncOutcome::MissingElement { id });
        prop_assert!(page.requests().is_empty());
    }

    #[test]
    fn target_is_document_top_minus_offset(
        document_top in px(100_000),
        scroll_y in px(50_000),
        offset in px(500),
    ) {
        let mut page = build_page(&[("target".to_owned(), document_top)], scroll_y)
            .with_hash("#target");
        let viewport_top = page.element_viewport_top("target").unwrap();
        prop_assert_eq!(scroll_target(viewport_top, scroll_y, offset), document_top - offset);

        let request = sync_to_anchor(&mut page, offset).request().unwrap();
        prop_assert_eq!(request.top, document_top - offset);
    }

    #[test]
    fn repeated_pass_is_idempotent(
        (elements, scroll_y) in page_strategy(),
        pick in any::<prop::sample::Index>(),
        offset in px(500),
    ) {
        prop_assume!(!elements.is_empty());
        let (id, _) = &elements[pick.index(elements.len())];
        let mut page = build_page(&elements, scroll_y).with_hash(format!("#{id}"));
        let first = sync_to_anchor(&mut page, offset);
        let second = sync_to_anchor(&mut page, offset);
        prop_assert!(first.scrolled());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn each_fragment_change_runs_one_immediate_pass(
        ids in prop::collection::vec(ident(), 1..20),
    ) {
        let page = ids
            .iter()
            .enumerate()
            .fold(SimulatedPage::new(), |page, (i, id)| {
                page.with_element(id.clone(), 1000.0 * i as f64)
            });
        let mut session = SimulatedSession::new(SyncConfig::default(), page);
        session.load();
        session.advance(Duration::from_millis(100));
        let before = session.synchronizer().stats().passes;

        for id in &ids {
            let requests = session.page().requests().len();
            let outcome = session.navigate(format!("#{id}"));
            prop_assert!(matches!(outcome, TriggerOutcome::Synced(ref o) if o.scrolled()));
            prop_assert_eq!(session.page().requests().len(), requests + 1);
        }

        prop_assert_eq!(session.synchronizer().stats().passes - before, ids.len() as u64);
        prop_assert_eq!(session.now(), Duration::from_millis(100));
        prop_assert_eq!(session.pending_timers(), 0);
    }
}
