#![forbid(unsafe_code)]

//! Presentation layer for the admixture map web UI.
//!
//! The server renders the map and bar plots; this crate keeps the page around
//! them in shape:
//!
//! - [`InputFeedbackPresenter`] - success/warning state on the two upload inputs
//! - [`ClearOutputs`] - empties plot regions and upload controls
//! - [`LayoutSizer`] - fits sidebar, options, plot, and carousel panels to the viewport
//! - [`ResizeDebouncer`] - latest-wins coalescing of resize bursts
//! - [`UiController`] - routes page triggers to the components
//!
//! All DOM access goes through the `admixmap-dom` capability traits, so the
//! same code runs against the browser (`admixmap-web`) and against
//! [`admixmap_dom::MemoryDocument`] in tests.
//!
//! ```
//! use admixmap_dom::{MemoryDocument, MemoryNode};
//! use admixmap_ui::{FieldName, UiConfig, UiController};
//!
//! let mut doc = MemoryDocument::new(900.0);
//! doc.append(MemoryNode::new("input").with_id("admixture-input"));
//! doc.append(MemoryNode::new("i").with_id("admixture-success").with_class("hidden"));
//!
//! let mut ui = UiController::new(doc, UiConfig::default());
//! ui.present_success(FieldName::Admixture).unwrap();
//! ```

pub mod config;
pub mod contract;
pub mod controller;
pub mod feedback;
pub mod layout;
pub mod model;
pub mod outputs;
pub mod resize;

pub use config::{
    ConfigError, FeedbackConfig, LayoutConfig, MessageMarkup, RepeatPolicy, ResizeConfig,
    UiConfig, UiConfigParse,
};
pub use contract::{DomContract, FieldContract, LayoutContract, PlotContract, UploadContract};
pub use controller::{ResizeStep, Trigger, UiController};
pub use feedback::InputFeedbackPresenter;
pub use layout::{LayoutMeasurements, LayoutMetrics, LayoutPhase, LayoutReport, LayoutSizer, Panel};
pub use model::{FeedbackOutcome, FieldName, PlotTarget};
pub use outputs::{ClearOutputs, UploadsCleared};
pub use resize::{DebouncerStats, ResizeAction, ResizeDebouncer};
