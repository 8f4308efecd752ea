#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::{Rc, Weak};

use admixmap_dom::DomError;
use admixmap_ui::{ResizeStep, Trigger, UiConfig, UiController};
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;
use web_time::{Duration, Instant};

use crate::args::{data_attribute, parse_field, parse_level, parse_target};
use crate::document::WebDocument;
use crate::logging;

fn js_error(err: impl Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Shared state reachable from the resize listener and the deferred-tick timer.
struct Runtime {
    window: Window,
    controller: RefCell<UiController<WebDocument>>,
    timeout: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
    resize: RefCell<Option<Closure<dyn FnMut()>>>,
}

impl Runtime {
    fn on_resize(self: &Rc<Self>) -> Result<ResizeStep, DomError> {
        let step = self
            .controller
            .borrow_mut()
            .handle_resize_at(Instant::now());
        self.follow(step)
    }

    fn on_tick(self: &Rc<Self>) {
        self.timeout.set(None);
        let step = self.controller.borrow_mut().tick_at(Instant::now());
        // Failures were already logged by the controller.
        let _ = self.follow(step);
    }

    fn follow(
        self: &Rc<Self>,
        step: Result<ResizeStep, DomError>,
    ) -> Result<ResizeStep, DomError> {
        if let Ok(ResizeStep::Deferred(delay)) = &step {
            self.schedule(*delay);
        }
        step
    }

    /// Arm the tick timer unless one is already pending. An early tick just
    /// reports the remaining delay and re-arms.
    fn schedule(self: &Rc<Self>, delay: Duration) {
        if self.timeout.get().is_some() {
            return;
        }
        let mut tick = self.tick.borrow_mut();
        let callback = tick.get_or_insert_with(|| {
            let weak: Weak<Self> = Rc::downgrade(self);
            Closure::new(move || {
                if let Some(runtime) = weak.upgrade() {
                    runtime.on_tick();
                }
            })
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(id) => {
                debug!(delay_ms = millis, "resize tick scheduled");
                self.timeout.set(Some(id));
            }
            Err(err) => warn!(error = ?err, "setTimeout rejected; resize pass dropped"),
        }
    }

    fn cancel_timer(&self) {
        if let Some(id) = self.timeout.take() {
            self.window.clear_timeout_with_handle(id);
        }
    }

    fn detach_listener(&self) {
        if let Some(listener) = self.resize.borrow_mut().take()
            && let Err(err) = self
                .window
                .remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "failed to remove resize listener");
        }
    }
}

/// Page-facing handle to the admixture map UI layer.
///
/// Construct once after the page markup is in place; wire the upload, plot,
/// clear, and sample buttons to the methods below.
#[wasm_bindgen]
pub struct AdmixMapUi {
    runtime: Rc<Runtime>,
}

#[wasm_bindgen]
impl AdmixMapUi {
    /// Build the UI layer over `window.document`.
    ///
    /// `options` is an optional plain object deserialized as the UI config;
    /// `data-admixmap-*` attributes on `<body>` override it.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<AdmixMapUi, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no global window"))?;
        let document = WebDocument::new(window.clone()).map_err(js_error)?;

        let base = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                serde_wasm_bindgen::from_value::<UiConfig>(value).map_err(js_error)?
            }
            _ => UiConfig::default(),
        };
        let parsed = base.overlay_attributes(|key| document.body_attribute(&data_attribute(key)));
        for err in &parsed.errors {
            warn!(%err, "ignoring config attribute");
        }
        let config = parsed.config;
        if let Err(errors) = config.validate() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(js_error(format!("invalid UI config: {joined}")));
        }

        Ok(Self {
            runtime: Rc::new(Runtime {
                window,
                controller: RefCell::new(UiController::new(document, config)),
                timeout: Cell::new(None),
                tick: RefCell::new(None),
                resize: RefCell::new(None),
            }),
        })
    }

    /// Route `tracing` output to the browser console at `level`
    /// (`error|warn|info|debug|trace`, default `info`). Returns `false` if
    /// logging was already initialized.
    #[wasm_bindgen(js_name = initLogging)]
    pub fn init_logging(level: Option<String>) -> bool {
        logging::init(parse_level(level.as_deref()))
    }

    #[wasm_bindgen(js_name = presentSuccess)]
    pub fn present_success(&self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field).map_err(js_error)?;
        self.controller_call(|ui| ui.present_success(field))
    }

    #[wasm_bindgen(js_name = presentWarning)]
    pub fn present_warning(&self, field: &str, message: &str) -> Result<(), JsValue> {
        let field = parse_field(field).map_err(js_error)?;
        self.controller_call(|ui| ui.present_warning(field, message))
    }

    #[wasm_bindgen(js_name = clearFeedback)]
    pub fn clear_feedback(&self, field: &str) -> Result<(), JsValue> {
        let field = parse_field(field).map_err(js_error)?;
        self.controller_call(|ui| ui.clear_feedback(field))
    }

    /// Clear a plot region before the server redraws it (`map` or `bar`).
    #[wasm_bindgen(js_name = clearPlot)]
    pub fn clear_plot(&self, target: &str) -> Result<(), JsValue> {
        let target = parse_target(target).map_err(js_error)?;
        self.controller_call(|ui| ui.dispatch(Trigger::PlotData(target)))
    }

    #[wasm_bindgen(js_name = clearUploads)]
    pub fn clear_uploads(&self) -> Result<(), JsValue> {
        self.controller_call(|ui| ui.dispatch(Trigger::ClearUploads))
    }

    #[wasm_bindgen(js_name = loadSampleData)]
    pub fn load_sample_data(&self) -> Result<(), JsValue> {
        self.controller_call(|ui| ui.dispatch(Trigger::LoadSampleData))
    }

    /// Initial sizing pass; call once the page has rendered.
    #[wasm_bindgen(js_name = applyLayout)]
    pub fn apply_layout(&self) -> Result<(), JsValue> {
        self.controller_call(|ui| ui.initial_layout().map(drop))
    }

    /// Feed one resize event. Deferred passes are driven by an internal timer.
    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&self) -> Result<(), JsValue> {
        self.runtime.on_resize().map(drop).map_err(js_error)
    }

    /// Subscribe to `window` resize events. Calling it twice is a no-op.
    #[wasm_bindgen(js_name = installResizeListener)]
    pub fn install_resize_listener(&self) -> Result<(), JsValue> {
        let mut slot = self.runtime.resize.borrow_mut();
        if slot.is_some() {
            return Ok(());
        }
        let weak = Rc::downgrade(&self.runtime);
        let listener: Closure<dyn FnMut()> = Closure::new(move || {
            if let Some(runtime) = weak.upgrade() {
                let _ = runtime.on_resize();
            }
        });
        self.runtime
            .window
            .add_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())?;
        *slot = Some(listener);
        debug!("resize listener installed");
        Ok(())
    }

    /// Remove the resize listener and cancel any pending pass.
    pub fn destroy(&mut self) {
        self.runtime.detach_listener();
        self.runtime.cancel_timer();
        self.runtime.tick.borrow_mut().take();
    }
}

impl AdmixMapUi {
    fn controller_call<F>(&self, f: F) -> Result<(), JsValue>
    where
        F: FnOnce(&mut UiController<WebDocument>) -> Result<(), DomError>,
    {
        let mut ui = self
            .runtime
            .controller
            .try_borrow_mut()
            .map_err(|_| js_error("AdmixMapUi is busy (re-entrant call)"))?;
        f(&mut ui).map_err(js_error)
    }
}

impl Drop for AdmixMapUi {
    fn drop(&mut self) {
        self.destroy();
    }
}
