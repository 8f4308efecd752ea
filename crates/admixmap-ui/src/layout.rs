//! Viewport-filling panel heights.
//!
//! Every pass re-measures the page chrome, computes all panel heights, and only
//! then writes them as one batch:
//!
//! ```text
//! sidebar  = window - navbar - navbar_margin - 20
//! options  = sidebar - nonparam - pills - 25
//! main     = window - navbar - navbar_margin - nav_tabs - 20
//! map      = main
//! bar      = main            (initial load)
//!          = main - 5        (resize)
//! carousel = main - 5
//! ```
//!
//! Nothing is cached between passes: text reflow can change any measured
//! element when the viewport width changes.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Measured element absent | Measures as 0, reported in `missing` |
//! | Computed height below `min_height` | Clamped, panel listed in `clamped` |
//! | Target container absent | Write skipped, reported in `missing` |

use admixmap_dom::css::format_px;
use admixmap_dom::{DomError, ElementLookup, ElementMutator, Locator, StyleProperty};
use tracing::{debug, warn};

use crate::config::LayoutConfig;
use crate::contract::{DomContract, LayoutContract};

/// Which pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    /// First pass on page load.
    Initial,
    /// Pass triggered by a viewport resize. Clears rendered plots first.
    Resize,
}

/// Fresh readings taken at the start of a pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMeasurements {
    pub window_height: f64,
    pub navbar_height: f64,
    pub navbar_margin: f64,
    pub nav_tabs_height: f64,
    pub nonparam_height: f64,
    pub pills_height: f64,
}

/// A sized panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Sidebar,
    Options,
    Map,
    Bar,
    CarouselItem,
}

impl Panel {
    pub const ALL: [Self; 5] = [
        Self::Sidebar,
        Self::Options,
        Self::Map,
        Self::Bar,
        Self::CarouselItem,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sidebar => "sidebar",
            Self::Options => "options",
            Self::Map => "map",
            Self::Bar => "bar",
            Self::CarouselItem => "carousel_item",
        }
    }
}

/// All panel heights of one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutMetrics {
    pub sidebar: f64,
    pub options: f64,
    pub map: f64,
    pub bar: f64,
    pub carousel_item: f64,
    /// Panels whose computed height fell below the minimum.
    pub clamped: Vec<Panel>,
}

impl LayoutMetrics {
    /// Compute every panel height from `m`.
    #[must_use]
    pub fn compute(m: &LayoutMeasurements, config: &LayoutConfig, phase: LayoutPhase) -> Self {
        let below_navbar = m.window_height - m.navbar_height - m.navbar_margin;
        let sidebar = below_navbar - config.sidebar_padding;
        let options = sidebar - m.nonparam_height - m.pills_height - config.options_padding;
        let main = below_navbar - m.nav_tabs_height - config.main_padding;
        let bar = match phase {
            LayoutPhase::Initial => main,
            LayoutPhase::Resize => main - config.resize_bar_inset,
        };
        let carousel_item = main - config.carousel_inset;

        // Heights never go below zero, whatever the configured minimum.
        let floor = config.min_height.max(0.0);
        let mut clamped = Vec::new();
        let mut clamp = |panel: Panel, value: f64| {
            if value >= floor {
                value
            } else {
                clamped.push(panel);
                floor
            }
        };
        let sidebar = clamp(Panel::Sidebar, sidebar);
        let options = clamp(Panel::Options, options);
        let map = clamp(Panel::Map, main);
        let bar = clamp(Panel::Bar, bar);
        let carousel_item = clamp(Panel::CarouselItem, carousel_item);

        Self {
            sidebar,
            options,
            map,
            bar,
            carousel_item,
            clamped,
        }
    }

    #[must_use]
    pub fn height(&self, panel: Panel) -> f64 {
        match panel {
            Panel::Sidebar => self.sidebar,
            Panel::Options => self.options,
            Panel::Map => self.map,
            Panel::Bar => self.bar,
            Panel::CarouselItem => self.carousel_item,
        }
    }
}

/// Outcome of a layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub phase: LayoutPhase,
    pub measurements: LayoutMeasurements,
    pub metrics: LayoutMetrics,
    /// Carousel items that received a height.
    pub carousel_items: usize,
    /// Elements that were absent during this pass.
    pub missing: Vec<Locator>,
}

/// Sizes the sidebar, options, plot, and carousel panels to the viewport.
#[derive(Debug, Clone)]
pub struct LayoutSizer {
    config: LayoutConfig,
    contract: LayoutContract,
    map_container: Locator,
    bar_container: Locator,
}

impl LayoutSizer {
    #[must_use]
    pub fn new(config: LayoutConfig, contract: &DomContract) -> Self {
        Self {
            config,
            contract: contract.layout.clone(),
            map_container: contract.map.container.clone(),
            bar_container: contract.bar.container.clone(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Read every input of the computation. Absent elements measure as 0 and
    /// are appended to `missing`.
    pub fn measure<D: ElementLookup>(&self, doc: &D, missing: &mut Vec<Locator>) -> LayoutMeasurements {
        let mut read = |locator: &Locator, margin: bool| match doc.find(locator) {
            Some(el) if margin => doc.margin_bottom(&el),
            Some(el) => doc.offset_height(&el),
            None => {
                if !missing.contains(locator) {
                    missing.push(locator.clone());
                }
                0.0
            }
        };
        let c = &self.contract;
        LayoutMeasurements {
            window_height: doc.viewport_height(),
            navbar_height: read(&c.navbar, false),
            navbar_margin: read(&c.navbar, true),
            nav_tabs_height: read(&c.nav_tabs, false),
            nonparam_height: read(&c.sidebar_nonparam, false),
            pills_height: read(&c.options_pills, false),
        }
    }

    /// Run one pass. On [`LayoutPhase::Resize`] both plot containers are
    /// emptied first, since rendered plots do not reflow.
    pub fn apply<D: ElementMutator>(
        &self,
        doc: &mut D,
        phase: LayoutPhase,
    ) -> Result<LayoutReport, DomError> {
        let mut missing = Vec::new();

        if phase == LayoutPhase::Resize {
            for locator in [&self.map_container, &self.bar_container] {
                match doc.find(locator) {
                    Some(container) => doc.set_text_content(&container, "")?,
                    None => missing.push(locator.clone()),
                }
            }
        }

        let measurements = self.measure(doc, &mut missing);
        let metrics = LayoutMetrics::compute(&measurements, &self.config, phase);
        if !metrics.clamped.is_empty() {
            let panels: Vec<_> = metrics.clamped.iter().map(|p| p.as_str()).collect();
            warn!(
                ?panels,
                window_height = measurements.window_height,
                min_height = self.config.min_height,
                "layout heights clamped to minimum"
            );
        }

        let c = &self.contract;
        let targets = [
            (&c.sidebar_container, metrics.sidebar),
            (&c.options_container, metrics.options),
            (&self.map_container, metrics.map),
            (&self.bar_container, metrics.bar),
        ];
        let resolved: Vec<_> = targets
            .into_iter()
            .filter_map(|(locator, height)| match doc.find(locator) {
                Some(el) => Some((el, height)),
                None => {
                    if !missing.contains(locator) {
                        missing.push(locator.clone());
                    }
                    None
                }
            })
            .collect();
        let carousel = doc.find_all(&c.carousel_items);

        for (el, height) in &resolved {
            doc.set_style(el, StyleProperty::Height, &format_px(*height))?;
        }
        let carousel_height = format_px(metrics.carousel_item);
        for item in &carousel {
            doc.set_style(item, StyleProperty::Height, &carousel_height)?;
        }

        if !missing.is_empty() {
            let missing: Vec<_> = missing.iter().map(ToString::to_string).collect();
            warn!(?missing, "layout elements absent");
        }
        debug!(
            ?phase,
            sidebar = metrics.sidebar,
            options = metrics.options,
            map = metrics.map,
            bar = metrics.bar,
            carousel_item = metrics.carousel_item,
            carousel_items = carousel.len(),
            "layout applied"
        );

        Ok(LayoutReport {
            phase,
            measurements,
            metrics,
            carousel_items: carousel.len(),
            missing,
        })
    }
}
