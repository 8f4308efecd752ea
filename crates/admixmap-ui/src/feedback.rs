//! Upload validation feedback next to the file inputs.
//!
//! Each call is a stateless projection of `(field, outcome)` onto the field's
//! own elements. Required elements are resolved before the first write, so a
//! markup mismatch leaves the document untouched.

use admixmap_dom::{DomError, ElementMutator, NewNode, NodeContent, StyleProperty};
use tracing::debug;

use crate::config::{FeedbackConfig, MessageMarkup, RepeatPolicy};
use crate::contract::{DomContract, FieldContract};
use crate::model::{FeedbackOutcome, FieldName};

/// Renders success/warning state on the admixture and coordinates inputs.
#[derive(Debug, Clone)]
pub struct InputFeedbackPresenter {
    config: FeedbackConfig,
    admixture: FieldContract,
    coordinates: FieldContract,
}

impl InputFeedbackPresenter {
    #[must_use]
    pub fn new(config: FeedbackConfig, contract: &DomContract) -> Self {
        Self {
            config,
            admixture: contract.admixture.clone(),
            coordinates: contract.coordinates.clone(),
        }
    }

    fn contract(&self, field: FieldName) -> &FieldContract {
        match field {
            FieldName::Admixture => &self.admixture,
            FieldName::Coordinates => &self.coordinates,
        }
    }

    /// Render `outcome` for `field`.
    pub fn present<D: ElementMutator>(
        &self,
        doc: &mut D,
        field: FieldName,
        outcome: &FeedbackOutcome,
    ) -> Result<(), DomError> {
        match outcome {
            FeedbackOutcome::Success => self.present_success(doc, field),
            FeedbackOutcome::Warning { message } => self.present_warning(doc, field, message),
        }
    }

    /// Success border, trailing radius, and success icon. Idempotent.
    pub fn present_success<D: ElementMutator>(
        &self,
        doc: &mut D,
        field: FieldName,
    ) -> Result<(), DomError> {
        let contract = self.contract(field);
        let input = doc.require(&contract.input)?;
        let icon = doc.require(&contract.success_icon)?;

        self.style_input(doc, &input, &self.config.success_color)?;
        doc.remove_class(&icon, &self.config.hidden_class)?;
        debug!(field = field.as_str(), "upload feedback: success");
        Ok(())
    }

    /// Warning border, trailing radius, warning icon, and a message node right
    /// after the field's input container.
    ///
    /// Under [`RepeatPolicy::Replace`] earlier messages for this field are
    /// removed first, leaving exactly one. Under [`RepeatPolicy::Append`] each
    /// call adds another node.
    pub fn present_warning<D: ElementMutator>(
        &self,
        doc: &mut D,
        field: FieldName,
        message: &str,
    ) -> Result<(), DomError> {
        let contract = self.contract(field);
        let input = doc.require(&contract.input)?;
        let icon = doc.require(&contract.warning_icon)?;
        let group = doc.require(&contract.input_group)?;
        let stale = match self.config.repeat {
            RepeatPolicy::Replace => doc.find_all(&contract.message()),
            RepeatPolicy::Append => Vec::new(),
        };

        self.style_input(doc, &input, &self.config.warning_color)?;
        doc.remove_class(&icon, &self.config.hidden_class)?;
        for node in &stale {
            doc.remove(node)?;
        }
        let content = match self.config.markup {
            MessageMarkup::Text => NodeContent::Text(message.to_owned()),
            MessageMarkup::Raw => NodeContent::Markup(message.to_owned()),
        };
        doc.insert_after(
            &group,
            NewNode {
                tag: self.config.message_tag.clone(),
                id: contract.message_id.clone(),
                classes: self.config.message_classes.clone(),
                content,
            },
        )?;
        debug!(
            field = field.as_str(),
            replaced = stale.len(),
            "upload feedback: warning"
        );
        Ok(())
    }

    /// Return `field` to its neutral look: default border, both icons hidden,
    /// no message nodes. Elements that are already gone are skipped.
    pub fn clear_feedback<D: ElementMutator>(
        &self,
        doc: &mut D,
        field: FieldName,
    ) -> Result<(), DomError> {
        let contract = self.contract(field);
        if let Some(input) = doc.find(&contract.input) {
            for property in [
                StyleProperty::BorderColor,
                StyleProperty::BorderTopRightRadius,
                StyleProperty::BorderBottomRightRadius,
            ] {
                doc.remove_style(&input, property)?;
            }
        }
        for icon in [&contract.success_icon, &contract.warning_icon] {
            if let Some(icon) = doc.find(icon) {
                doc.add_class(&icon, &self.config.hidden_class)?;
            }
        }
        let messages = doc.find_all(&contract.message());
        for node in &messages {
            doc.remove(node)?;
        }
        debug!(
            field = field.as_str(),
            removed = messages.len(),
            "upload feedback: cleared"
        );
        Ok(())
    }

    fn style_input<D: ElementMutator>(
        &self,
        doc: &mut D,
        input: &D::Handle,
        color: &str,
    ) -> Result<(), DomError> {
        doc.set_style(input, StyleProperty::BorderColor, color)?;
        doc.set_style(
            input,
            StyleProperty::BorderTopRightRadius,
            &self.config.corner_radius,
        )?;
        doc.set_style(
            input,
            StyleProperty::BorderBottomRightRadius,
            &self.config.corner_radius,
        )
    }
}
