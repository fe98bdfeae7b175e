#![forbid(unsafe_code)]

//! Browser binding for `anchor-scroll`.
//!
//! [`AnchorScrollBinding`] is a `wasm-bindgen` export that subscribes to
//! `DOMContentLoaded` and `hashchange` in `attach` (the JS constructor) and
//! unsubscribes on `detach()` (or when freed). From JS:
//!
//! ```text
//! const binding = new AnchorScrollBinding('{"offset_px":120}');
//! // ... page lifetime ...
//! binding.detach();
//! ```

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::AnchorScrollBinding;

pub mod binding_core;
