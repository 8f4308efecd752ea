#![forbid(unsafe_code)]

//! WASM frontend for the admixture map UI layer.
//!
//! Exposes the `AdmixMapUi` JS class (via `wasm-bindgen`) that the page's
//! event bindings call into:
//! - upload feedback (`presentSuccess`, `presentWarning`, `clearFeedback`),
//! - plot and upload clearing (`clearPlot`, `clearUploads`, `loadSampleData`),
//! - viewport layout (`applyLayout`, `onResize`, `installResizeListener`).
//!
//! The DOM work itself lives in `admixmap-ui`; this crate only supplies the
//! `web-sys` implementation of the capability traits and the JS glue.

pub mod args;

#[cfg(target_arch = "wasm32")]
mod document;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use document::WebDocument;
#[cfg(target_arch = "wasm32")]
pub use wasm::AdmixMapUi;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AdmixMapUi;

#[cfg(not(target_arch = "wasm32"))]
impl AdmixMapUi {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
