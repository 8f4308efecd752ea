//! Field, outcome, and plot target vocabulary.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the two upload slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Admixture,
    #[serde(alias = "coords")]
    Coordinates,
}

impl FieldName {
    pub const ALL: [Self; 2] = [Self::Admixture, Self::Coordinates];

    /// Prefix used to derive this field's element ids (`admixture-success`,
    /// `coords-warning`, ...).
    #[must_use]
    pub const fn dom_key(self) -> &'static str {
        match self {
            Self::Admixture => "admixture",
            Self::Coordinates => "coords",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admixture => "admixture",
            Self::Coordinates => "coordinates",
        }
    }

    /// The other upload slot.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Admixture => Self::Coordinates,
            Self::Coordinates => Self::Admixture,
        }
    }

    /// Parse a host-supplied field name (`admixture`, `coords`, `coordinates`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admixture" => Some(Self::Admixture),
            "coords" | "coordinates" => Some(Self::Coordinates),
            _ => None,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation result rendered next to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedbackOutcome {
    Success,
    Warning { message: String },
}

impl FeedbackOutcome {
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }
}

/// One of the two rendered visualization regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotTarget {
    Map,
    Bar,
}

impl PlotTarget {
    pub const ALL: [Self; 2] = [Self::Map, Self::Bar];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Map => "map",
            Self::Bar => "bar",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "map" => Some(Self::Map),
            "bar" => Some(Self::Bar),
            _ => None,
        }
    }
}

impl fmt::Display for PlotTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
