//! Argument parsing for the JS surface.
//!
//! JS passes plain strings; these helpers turn them into typed values with
//! messages suitable for a thrown `Error`.

use admixmap_ui::{FieldName, PlotTarget};
use tracing::Level;

/// Prefix of the `<body>` attributes read as configuration.
pub const DATA_ATTR_PREFIX: &str = "data-admixmap-";

/// `<body>` attribute name for a configuration key.
#[must_use]
pub fn data_attribute(key: &str) -> String {
    format!("{DATA_ATTR_PREFIX}{key}")
}

pub fn parse_field(value: &str) -> Result<FieldName, String> {
    FieldName::parse(value)
        .ok_or_else(|| format!("unknown upload field {value:?} (expected admixture|coords)"))
}

pub fn parse_target(value: &str) -> Result<PlotTarget, String> {
    PlotTarget::parse(value)
        .ok_or_else(|| format!("unknown plot target {value:?} (expected map|bar)"))
}

/// Log level from an optional JS string; `info` when absent or unrecognized.
#[must_use]
pub fn parse_level(value: Option<&str>) -> Level {
    value
        .and_then(|v| v.trim().parse::<Level>().ok())
        .unwrap_or(Level::INFO)
}
