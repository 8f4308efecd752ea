//! Clearing rendered plots and upload controls.

use admixmap_dom::{DomError, ElementMutator, StyleProperty};
use tracing::debug;

use crate::contract::{DomContract, PlotContract, UploadContract};
use crate::model::PlotTarget;

/// Number of elements reset by [`ClearOutputs::clear_uploads`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadsCleared {
    pub form_controls: usize,
    pub progress_indicators: usize,
}

/// Resets plot regions before a re-render and upload controls on demand.
#[derive(Debug, Clone)]
pub struct ClearOutputs {
    hidden_class: String,
    map: PlotContract,
    bar: PlotContract,
    uploads: UploadContract,
}

impl ClearOutputs {
    #[must_use]
    pub fn new(hidden_class: impl Into<String>, contract: &DomContract) -> Self {
        Self {
            hidden_class: hidden_class.into(),
            map: contract.map.clone(),
            bar: contract.bar.clone(),
            uploads: contract.uploads.clone(),
        }
    }

    fn contract(&self, target: PlotTarget) -> &PlotContract {
        match target {
            PlotTarget::Map => &self.map,
            PlotTarget::Bar => &self.bar,
        }
    }

    /// Empty the plot container and hide both of its download buttons.
    pub fn clear_plot<D: ElementMutator>(
        &self,
        doc: &mut D,
        target: PlotTarget,
    ) -> Result<(), DomError> {
        let contract = self.contract(target);
        let container = doc.require(&contract.container)?;
        let dropdown = doc.require(&contract.dropdown_button)?;
        let display = doc.require(&contract.display_button)?;

        doc.set_text_content(&container, "")?;
        doc.add_class(&dropdown, &self.hidden_class)?;
        doc.add_class(&display, &self.hidden_class)?;
        debug!(plot = target.as_str(), "plot cleared");
        Ok(())
    }

    /// Empty every form control and hide every upload progress indicator,
    /// across both fields.
    pub fn clear_uploads<D: ElementMutator>(&self, doc: &mut D) -> Result<UploadsCleared, DomError> {
        let controls = doc.find_all(&self.uploads.form_controls);
        let indicators = doc.find_all(&self.uploads.progress_indicators);

        for control in &controls {
            doc.set_value(control, "")?;
        }
        for indicator in &indicators {
            doc.set_style(indicator, StyleProperty::Display, "none")?;
        }
        let cleared = UploadsCleared {
            form_controls: controls.len(),
            progress_indicators: indicators.len(),
        };
        debug!(
            form_controls = cleared.form_controls,
            progress_indicators = cleared.progress_indicators,
            "uploads cleared"
        );
        Ok(cleared)
    }
}
