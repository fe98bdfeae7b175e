#![forbid(unsafe_code)]

//! URL fragment handling.

/// Extract the element identifier named by a location hash.
///
/// Strips exactly one leading `#` and returns the rest verbatim (no
/// percent-decoding). Returns `None` when nothing names an element.
#[must_use]
pub fn anchor_id(hash: &str) -> Option<&str> {
    let id = hash.strip_prefix('#').unwrap_or(hash);
    if id.is_empty() { None } else { Some(id) }
}
