#![forbid(unsafe_code)]

//! Host abstraction: the document, its layout and the viewport scroller.

use serde::{Deserialize, Serialize};

/// Transition mode for a viewport scroll.
///
/// Duration and easing of `Smooth` belong to the host.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
    Auto,
}

impl ScrollBehavior {
    /// Name used by the DOM `ScrollToOptions.behavior` member.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Instant => "instant",
            Self::Auto => "auto",
        }
    }
}

/// A vertical scroll request. Horizontal position is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    /// Document-relative target for the top of the viewport.
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Everything the synchronizer reads from, or asks of, its environment.
///
/// Implementations must not mutate the fragment or the document from any of
/// the read methods.
pub trait AnchorHost {
    /// Current location hash, including the leading `#` when present.
    fn location_hash(&self) -> String;

    /// Viewport-relative top edge of the element with identifier `id`, or
    /// `None` if the document has no such element.
    fn element_viewport_top(&self, id: &str) -> Option<f64>;

    /// Current vertical page scroll offset.
    fn scroll_y(&self) -> f64;

    /// Hand a scroll request to the host's scrolling facility.
    fn scroll_to(&mut self, request: ScrollRequest);
}
