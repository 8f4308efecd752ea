//! Trigger dispatch.
//!
//! [`UiController`] owns the document capability and the components, and maps
//! the page's triggers (plot button, clear/sample buttons, window resize) onto
//! them. Failures are logged at `warn` and returned; nothing here panics on
//! missing markup.

use admixmap_dom::{DomError, ElementMutator};
use tracing::{info, warn};
use web_time::{Duration, Instant};

use crate::config::UiConfig;
use crate::feedback::InputFeedbackPresenter;
use crate::layout::{LayoutPhase, LayoutReport, LayoutSizer};
use crate::model::{FeedbackOutcome, FieldName, PlotTarget};
use crate::outputs::{ClearOutputs, UploadsCleared};
use crate::resize::{ResizeAction, ResizeDebouncer};

/// Page-level event routed through [`UiController::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// "Load sample data": reset uploads, then mark both fields valid.
    LoadSampleData,
    /// "Clear uploads": reset upload controls and feedback for both fields.
    ClearUploads,
    /// "Plot data": clear the target before the server redraws it.
    PlotData(PlotTarget),
    /// Browser viewport resize.
    Resize,
}

/// Result of feeding a resize event or tick.
#[derive(Debug, Clone, PartialEq)]
pub enum ResizeStep {
    /// Nothing pending.
    Idle,
    /// A pass is pending; tick again after the given delay.
    Deferred(Duration),
    /// A layout pass ran.
    Applied(LayoutReport),
}

/// Binds a document to the feedback, output, and layout components.
#[derive(Debug)]
pub struct UiController<D> {
    document: D,
    config: UiConfig,
    feedback: InputFeedbackPresenter,
    outputs: ClearOutputs,
    sizer: LayoutSizer,
    debouncer: ResizeDebouncer,
}

impl<D: ElementMutator> UiController<D> {
    #[must_use]
    pub fn new(document: D, config: UiConfig) -> Self {
        let feedback = InputFeedbackPresenter::new(config.feedback.clone(), &config.contract);
        let outputs = ClearOutputs::new(config.feedback.hidden_class.clone(), &config.contract);
        let sizer = LayoutSizer::new(config.layout, &config.contract);
        let debouncer = ResizeDebouncer::new(config.resize);
        Self {
            document,
            config,
            feedback,
            outputs,
            sizer,
            debouncer,
        }
    }

    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    #[must_use]
    pub fn into_document(self) -> D {
        self.document
    }

    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    #[must_use]
    pub fn debouncer(&self) -> &ResizeDebouncer {
        &self.debouncer
    }

    pub fn present_success(&mut self, field: FieldName) -> Result<(), DomError> {
        self.feedback
            .present_success(&mut self.document, field)
            .inspect_err(|err| warn!(field = field.as_str(), %err, "success feedback skipped"))
    }

    pub fn present_warning(&mut self, field: FieldName, message: &str) -> Result<(), DomError> {
        self.feedback
            .present_warning(&mut self.document, field, message)
            .inspect_err(|err| warn!(field = field.as_str(), %err, "warning feedback skipped"))
    }

    pub fn present(&mut self, field: FieldName, outcome: &FeedbackOutcome) -> Result<(), DomError> {
        match outcome {
            FeedbackOutcome::Success => self.present_success(field),
            FeedbackOutcome::Warning { message } => self.present_warning(field, message),
        }
    }

    pub fn clear_feedback(&mut self, field: FieldName) -> Result<(), DomError> {
        self.feedback
            .clear_feedback(&mut self.document, field)
            .inspect_err(|err| warn!(field = field.as_str(), %err, "feedback reset failed"))
    }

    pub fn clear_plot(&mut self, target: PlotTarget) -> Result<(), DomError> {
        self.outputs
            .clear_plot(&mut self.document, target)
            .inspect_err(|err| warn!(plot = target.as_str(), %err, "plot clear skipped"))
    }

    pub fn clear_uploads(&mut self) -> Result<UploadsCleared, DomError> {
        self.outputs
            .clear_uploads(&mut self.document)
            .inspect_err(|err| warn!(%err, "upload clear failed"))
    }

    /// Size panels on page load. Rendered plots are left alone.
    pub fn initial_layout(&mut self) -> Result<LayoutReport, DomError> {
        self.layout(LayoutPhase::Initial)
    }

    /// Feed a resize event observed at `now`.
    pub fn handle_resize_at(&mut self, now: Instant) -> Result<ResizeStep, DomError> {
        let action = self.debouncer.handle_resize_at(now);
        self.resize_step(action)
    }

    /// Drive a deferred resize pass.
    pub fn tick_at(&mut self, now: Instant) -> Result<ResizeStep, DomError> {
        let action = self.debouncer.tick_at(now);
        self.resize_step(action)
    }

    /// Run `trigger` to completion. Every step runs even if an earlier one
    /// failed; the first failure is returned.
    pub fn dispatch(&mut self, trigger: Trigger) -> Result<(), DomError> {
        info!(?trigger, "trigger");
        match trigger {
            Trigger::LoadSampleData => {
                let mut first_err = self.reset_uploads().err();
                for field in FieldName::ALL {
                    keep_first(&mut first_err, self.present_success(field));
                }
                first_err.map_or(Ok(()), Err)
            }
            Trigger::ClearUploads => self.reset_uploads(),
            Trigger::PlotData(target) => self.clear_plot(target),
            Trigger::Resize => self.handle_resize_at(Instant::now()).map(|_| ()),
        }
    }

    fn reset_uploads(&mut self) -> Result<(), DomError> {
        let mut first_err = self.clear_uploads().err();
        for field in FieldName::ALL {
            keep_first(&mut first_err, self.clear_feedback(field));
        }
        first_err.map_or(Ok(()), Err)
    }

    fn resize_step(&mut self, action: ResizeAction) -> Result<ResizeStep, DomError> {
        match action {
            ResizeAction::None => Ok(ResizeStep::Idle),
            ResizeAction::Defer { retry_in } => Ok(ResizeStep::Deferred(retry_in)),
            ResizeAction::Apply { .. } => self.layout(LayoutPhase::Resize).map(ResizeStep::Applied),
        }
    }

    fn layout(&mut self, phase: LayoutPhase) -> Result<LayoutReport, DomError> {
        self.sizer
            .apply(&mut self.document, phase)
            .inspect_err(|err| warn!(?phase, %err, "layout pass failed"))
    }
}

fn keep_first<T>(first: &mut Option<DomError>, result: Result<T, DomError>) {
    if let Err(err) = result
        && first.is_none()
    {
        *first = Some(err);
    }
}
