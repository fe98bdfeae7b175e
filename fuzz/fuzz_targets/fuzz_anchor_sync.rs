#![no_main]

use anchor_scroll::sim::SimulatedPage;
use anchor_scroll::{AnchorHost, SyncOutcome, anchor_id, sync_to_anchor};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    hash: String,
    elements: Vec<(String, i32)>,
    scroll_y: u16,
    offset: u16,
}

fuzz_target!(|input: Input| {
    if input.elements.len() > 64 || input.hash.len() > 256 {
        return;
    }

    let mut page = input
        .elements
        .iter()
        .fold(SimulatedPage::new(), |page, (id, top)| {
            page.with_element(id.clone(), f64::from(*top))
        })
        .with_hash(input.hash.clone());
    page.set_scroll_y(f64::from(input.scroll_y));
    let scroll_before = page.scroll_y();
    let offset = f64::from(input.offset);

    let expected_top = anchor_id(&input.hash).and_then(|id| {
        input
            .elements
            .iter()
            .rev()
            .find(|(known, _)| known == id)
            .map(|(_, top)| f64::from(*top))
    });

    match sync_to_anchor(&mut page, offset) {
        SyncOutcome::NoFragment => {
            assert!(anchor_id(&input.hash).is_none());
            assert!(page.requests().is_empty());
            assert_eq!(page.scroll_y(), scroll_before);
        }
        SyncOutcome::MissingElement { id } => {
            assert_eq!(anchor_id(&input.hash), Some(id.as_str()));
            assert!(expected_top.is_none());
            assert!(page.requests().is_empty());
        }
        SyncOutcome::Scrolled { request, .. } => {
            // Integral inputs keep the arithmetic exact.
            let top = expected_top.expect("scrolled without a matching element");
            assert_eq!(request.top, top - offset);
            assert_eq!(page.requests().len(), 1);
        }
    }
});
