//! UI configuration.
//!
//! Configuration comes from one of two places:
//!
//! - a JSON document (or JS options object on the web), deserialized with
//!   serde, where every omitted field keeps its default;
//! - flat key/value attributes read through a getter (on the web, the
//!   `data-admixmap-*` attributes of `<body>`), parsed by
//!   [`UiConfig::from_attributes_with`] with per-field diagnostics.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::DomContract;

pub const ATTR_MESSAGE_MARKUP: &str = "message-markup";
pub const ATTR_MESSAGE_REPEAT: &str = "message-repeat";
pub const ATTR_HIDDEN_CLASS: &str = "hidden-class";
pub const ATTR_RESIZE_DELAY_MS: &str = "resize-delay-ms";
pub const ATTR_RESIZE_DEADLINE_MS: &str = "resize-deadline-ms";
pub const ATTR_MIN_HEIGHT: &str = "min-height";

/// How warning message text is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageMarkup {
    /// Text node; the message is never interpreted as HTML.
    #[default]
    Text,
    /// Raw HTML. Only for trusted, server-authored messages.
    Raw,
}

impl MessageMarkup {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" | "escaped" => Some(Self::Text),
            "raw" | "html" => Some(Self::Raw),
            _ => None,
        }
    }
}

/// What a repeated warning for the same field does to the previous message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatPolicy {
    /// Remove earlier messages for the field first.
    #[default]
    Replace,
    /// Keep earlier messages; each warning adds another node.
    Append,
}

impl RepeatPolicy {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(Self::Replace),
            "append" => Some(Self::Append),
            _ => None,
        }
    }
}

/// Visual tokens for upload feedback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub success_color: String,
    pub warning_color: String,
    /// Trailing corner radius for an input with a button on its right.
    pub corner_radius: String,
    pub hidden_class: String,
    pub message_tag: String,
    pub message_classes: Vec<String>,
    pub markup: MessageMarkup,
    pub repeat: RepeatPolicy,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            success_color: "var(--flatly-success)".to_owned(),
            warning_color: "var(--flatly-warning)".to_owned(),
            corner_radius: "5px".to_owned(),
            hidden_class: "hidden".to_owned(),
            message_tag: "p".to_owned(),
            message_classes: ["p-1", "text-warning", "fw-bold", "error-message"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            markup: MessageMarkup::Text,
            repeat: RepeatPolicy::Replace,
        }
    }
}

/// Fixed offsets of the viewport layout computation, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Subtracted from the space below the navbar for the sidebar.
    pub sidebar_padding: f64,
    /// Subtracted from the sidebar for the options container.
    pub options_padding: f64,
    /// Subtracted from the space below the nav tabs for the plot panels.
    pub main_padding: f64,
    /// Carousel items sit this much shorter than the plot panels.
    pub carousel_inset: f64,
    /// Bar plot inset applied on resize only.
    pub resize_bar_inset: f64,
    /// Lower bound for every computed height.
    pub min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sidebar_padding: 20.0,
            options_padding: 25.0,
            main_padding: 20.0,
            carousel_inset: 5.0,
            resize_bar_inset: 5.0,
            min_height: 0.0,
        }
    }
}

/// Resize debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Quiet period after the last resize event before layout is applied.
    /// Zero applies on every event.
    pub delay_ms: u64,
    /// Upper bound on how long a burst can postpone layout.
    pub hard_deadline_ms: u64,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            hard_deadline_ms: 250,
        }
    }
}

/// Complete UI configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub feedback: FeedbackConfig,
    pub layout: LayoutConfig,
    pub resize: ResizeConfig,
    pub contract: DomContract,
}

/// Result of attribute parsing: the config plus every rejected value.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfigParse {
    pub config: UiConfig,
    pub errors: Vec<ConfigError>,
}

/// A rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl UiConfig {
    /// Parse a JSON document. Omitted fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse flat attributes through `get`, starting from defaults.
    ///
    /// Rejected values are reported and leave the default in place.
    #[must_use]
    pub fn from_attributes_with<F>(get: F) -> UiConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self::default().overlay_attributes(get)
    }

    /// Apply attribute overrides on top of `self`.
    #[must_use]
    pub fn overlay_attributes<F>(self, mut get: F) -> UiConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = self;
        let mut errors = Vec::new();

        if let Some(value) = get(ATTR_MESSAGE_MARKUP) {
            match MessageMarkup::parse(&value) {
                Some(parsed) => config.feedback.markup = parsed,
                None => errors.push(ConfigError::new(
                    "feedback.markup",
                    value,
                    "expected text|raw",
                )),
            }
        }

        if let Some(value) = get(ATTR_MESSAGE_REPEAT) {
            match RepeatPolicy::parse(&value) {
                Some(parsed) => config.feedback.repeat = parsed,
                None => errors.push(ConfigError::new(
                    "feedback.repeat",
                    value,
                    "expected replace|append",
                )),
            }
        }

        if let Some(value) = get(ATTR_HIDDEN_CLASS) {
            let trimmed = value.trim();
            if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
                errors.push(ConfigError::new(
                    "feedback.hidden_class",
                    value,
                    "expected a single class name",
                ));
            } else {
                config.feedback.hidden_class = trimmed.to_owned();
            }
        }

        if let Some(value) = get(ATTR_RESIZE_DELAY_MS) {
            match parse_u64(&value) {
                Some(parsed) => config.resize.delay_ms = parsed,
                None => errors.push(ConfigError::new(
                    "resize.delay_ms",
                    value,
                    "expected non-negative integer",
                )),
            }
        }

        if let Some(value) = get(ATTR_RESIZE_DEADLINE_MS) {
            match parse_u64(&value) {
                Some(parsed) => config.resize.hard_deadline_ms = parsed,
                None => errors.push(ConfigError::new(
                    "resize.hard_deadline_ms",
                    value,
                    "expected non-negative integer",
                )),
            }
        }

        if let Some(value) = get(ATTR_MIN_HEIGHT) {
            match parse_finite(&value).filter(|v| *v >= 0.0) {
                Some(parsed) => config.layout.min_height = parsed,
                None => errors.push(ConfigError::new(
                    "layout.min_height",
                    value,
                    "expected a non-negative number",
                )),
            }
        }

        UiConfigParse { config, errors }
    }

    /// Check cross-field constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.resize.delay_ms > 0 && self.resize.hard_deadline_ms < self.resize.delay_ms {
            errors.push(ConfigError::new(
                "resize.hard_deadline_ms",
                self.resize.hard_deadline_ms.to_string(),
                "must be >= resize.delay_ms",
            ));
        }
        let layout = &self.layout;
        for (field, value) in [
            ("layout.sidebar_padding", layout.sidebar_padding),
            ("layout.options_padding", layout.options_padding),
            ("layout.main_padding", layout.main_padding),
            ("layout.carousel_inset", layout.carousel_inset),
            ("layout.resize_bar_inset", layout.resize_bar_inset),
            ("layout.min_height", layout.min_height),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, value.to_string(), "must be finite"));
            }
        }
        if layout.min_height < 0.0 {
            errors.push(ConfigError::new(
                "layout.min_height",
                layout.min_height.to_string(),
                "must be >= 0",
            ));
        }
        if self.feedback.hidden_class.trim().is_empty() {
            errors.push(ConfigError::new(
                "feedback.hidden_class",
                self.feedback.hidden_class.clone(),
                "must not be empty",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[inline]
fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

#[inline]
fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
