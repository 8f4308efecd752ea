//! Named DOM contract.
//!
//! Every element this layer touches is addressed through a [`Locator`] held
//! here, so the markup dependency is one explicit table instead of selector
//! chains scattered across call sites. Defaults match the application's
//! markup; hosts can override any entry through [`UiConfig`](crate::UiConfig).

use admixmap_dom::Locator;
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{FieldName, PlotTarget};

/// Elements owned by one upload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldContract {
    pub input: Locator,
    pub input_group: Locator,
    pub success_icon: Locator,
    pub warning_icon: Locator,
    /// `id` given to inserted warning message nodes.
    pub message_id: String,
}

impl FieldContract {
    /// Contract derived from the field's id prefix.
    #[must_use]
    pub fn for_field(field: FieldName) -> Self {
        let key = field.dom_key();
        Self {
            input: Locator::id(format!("{key}-input")),
            input_group: Locator::id(format!("{key}-input-group")),
            success_icon: Locator::id(format!("{key}-success")),
            warning_icon: Locator::id(format!("{key}-warning")),
            message_id: format!("{key}-error-message"),
        }
    }

    /// Locator matching this field's message nodes.
    #[must_use]
    pub fn message(&self) -> Locator {
        Locator::id(self.message_id.clone())
    }
}

/// Elements owned by one plot region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotContract {
    pub container: Locator,
    pub dropdown_button: Locator,
    pub display_button: Locator,
}

impl PlotContract {
    #[must_use]
    pub fn for_target(target: PlotTarget) -> Self {
        match target {
            PlotTarget::Map => Self {
                container: Locator::id("main_plot-admixture_map"),
                dropdown_button: Locator::id("main_plot-dropdown_download_bttn"),
                display_button: Locator::id("map_download_bttn_display"),
            },
            PlotTarget::Bar => Self {
                container: Locator::id("bar_plot-admixture_barplot"),
                dropdown_button: Locator::id("bar_plot-dropdown_download_bttn"),
                display_button: Locator::id("bar_download_bttn_display"),
            },
        }
    }
}

/// Measured and sized layout regions. Plot containers come from
/// [`PlotContract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutContract {
    pub navbar: Locator,
    pub nav_tabs: Locator,
    pub sidebar_nonparam: Locator,
    pub options_pills: Locator,
    pub sidebar_container: Locator,
    pub options_container: Locator,
    pub carousel_items: Locator,
}

impl Default for LayoutContract {
    fn default() -> Self {
        Self {
            navbar: Locator::class("custom-navbar"),
            nav_tabs: Locator::class("nav-tabs"),
            sidebar_nonparam: Locator::class("sidebar-nonparam-container"),
            options_pills: Locator::id("options-pills-container"),
            sidebar_container: Locator::class("sidebar-container"),
            options_container: Locator::class("parameter-options-container"),
            carousel_items: Locator::class("carousel-item"),
        }
    }
}

/// Bulk upload controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadContract {
    pub form_controls: Locator,
    pub progress_indicators: Locator,
}

impl Default for UploadContract {
    fn default() -> Self {
        Self {
            form_controls: Locator::class("form-control"),
            progress_indicators: Locator::class("progress"),
        }
    }
}

/// The full markup contract.
///
/// Field and plot entries deserialize as overrides: any omitted locator keeps
/// the default for that field or plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomContract {
    #[serde(deserialize_with = "admixture_contract")]
    pub admixture: FieldContract,
    #[serde(deserialize_with = "coordinates_contract")]
    pub coordinates: FieldContract,
    #[serde(deserialize_with = "map_contract")]
    pub map: PlotContract,
    #[serde(deserialize_with = "bar_contract")]
    pub bar: PlotContract,
    pub layout: LayoutContract,
    pub uploads: UploadContract,
}

impl Default for DomContract {
    fn default() -> Self {
        Self {
            admixture: FieldContract::for_field(FieldName::Admixture),
            coordinates: FieldContract::for_field(FieldName::Coordinates),
            map: PlotContract::for_target(PlotTarget::Map),
            bar: PlotContract::for_target(PlotTarget::Bar),
            layout: LayoutContract::default(),
            uploads: UploadContract::default(),
        }
    }
}

impl DomContract {
    #[must_use]
    pub fn field(&self, field: FieldName) -> &FieldContract {
        match field {
            FieldName::Admixture => &self.admixture,
            FieldName::Coordinates => &self.coordinates,
        }
    }

    #[must_use]
    pub fn plot(&self, target: PlotTarget) -> &PlotContract {
        match target {
            PlotTarget::Map => &self.map,
            PlotTarget::Bar => &self.bar,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FieldOverride {
    input: Option<Locator>,
    input_group: Option<Locator>,
    success_icon: Option<Locator>,
    warning_icon: Option<Locator>,
    message_id: Option<String>,
}

impl FieldOverride {
    fn apply(self, base: FieldContract) -> FieldContract {
        FieldContract {
            input: self.input.unwrap_or(base.input),
            input_group: self.input_group.unwrap_or(base.input_group),
            success_icon: self.success_icon.unwrap_or(base.success_icon),
            warning_icon: self.warning_icon.unwrap_or(base.warning_icon),
            message_id: self.message_id.unwrap_or(base.message_id),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PlotOverride {
    container: Option<Locator>,
    dropdown_button: Option<Locator>,
    display_button: Option<Locator>,
}

impl PlotOverride {
    fn apply(self, base: PlotContract) -> PlotContract {
        PlotContract {
            container: self.container.unwrap_or(base.container),
            dropdown_button: self.dropdown_button.unwrap_or(base.dropdown_button),
            display_button: self.display_button.unwrap_or(base.display_button),
        }
    }
}

fn field_contract<'de, D: Deserializer<'de>>(
    de: D,
    field: FieldName,
) -> Result<FieldContract, D::Error> {
    FieldOverride::deserialize(de).map(|o| o.apply(FieldContract::for_field(field)))
}

fn plot_contract<'de, D: Deserializer<'de>>(
    de: D,
    target: PlotTarget,
) -> Result<PlotContract, D::Error> {
    PlotOverride::deserialize(de).map(|o| o.apply(PlotContract::for_target(target)))
}

fn admixture_contract<'de, D: Deserializer<'de>>(de: D) -> Result<FieldContract, D::Error> {
    field_contract(de, FieldName::Admixture)
}

fn coordinates_contract<'de, D: Deserializer<'de>>(de: D) -> Result<FieldContract, D::Error> {
    field_contract(de, FieldName::Coordinates)
}

fn map_contract<'de, D: Deserializer<'de>>(de: D) -> Result<PlotContract, D::Error> {
    plot_contract(de, PlotTarget::Map)
}

fn bar_contract<'de, D: Deserializer<'de>>(de: D) -> Result<PlotContract, D::Error> {
    plot_contract(de, PlotTarget::Bar)
}
