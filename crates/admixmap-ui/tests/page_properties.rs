//! Page-level properties against an in-memory copy of the application markup.
//!
//! Verifies:
//! 1. Feedback for one field never modifies the other field's elements
//! 2. A warning leaves exactly one verbatim message node, with the field's id
//! 3. Clearing map and bar plots commutes
//! 4. Clearing uploads is idempotent
//! 5. Layout heights for fixed measurements (810 / 555 / 770 / 765)
//! 6. Every applied resize clears both plots before resizing
//! 7. Height writes are issued as one batch after all reads
//! 8. Debounced resizes: the last event determines the final layout

use admixmap_dom::{
    ElementLookup, Locator, MemoryDocument, MemoryNode, MutationKind, NodeKey, StyleProperty,
};
use admixmap_ui::{
    FieldName, LayoutMeasurements, LayoutMetrics, LayoutPhase, PlotTarget, ResizeConfig,
    ResizeStep, Trigger, UiConfig, UiController,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use web_time::{Duration, Instant};

// ── Fixture ───────────────────────────────────────────────────────────

struct FieldNodes {
    group: NodeKey,
    input: NodeKey,
    success: NodeKey,
    warning: NodeKey,
}

struct Page {
    admixture: FieldNodes,
    coords: FieldNodes,
    map: NodeKey,
    bar: NodeKey,
    sidebar: NodeKey,
    options: NodeKey,
    carousel: Vec<NodeKey>,
    progress: Vec<NodeKey>,
}

impl Page {
    fn field(&self, field: FieldName) -> &FieldNodes {
        match field {
            FieldName::Admixture => &self.admixture,
            FieldName::Coordinates => &self.coords,
        }
    }
}

fn add_field(doc: &mut MemoryDocument, key: &str) -> FieldNodes {
    let group = doc.append(
        MemoryNode::new("div")
            .with_id(format!("{key}-input-group"))
            .with_class("input-group"),
    );
    let input = doc.append(
        MemoryNode::new("input")
            .with_id(format!("{key}-input"))
            .with_class("form-control")
            .with_value(format!("{key}.txt")),
    );
    let success = doc.append(
        MemoryNode::new("i")
            .with_id(format!("{key}-success"))
            .with_class("hidden"),
    );
    let warning = doc.append(
        MemoryNode::new("i")
            .with_id(format!("{key}-warning"))
            .with_class("hidden"),
    );
    FieldNodes {
        group,
        input,
        success,
        warning,
    }
}

fn page() -> (MemoryDocument, Page) {
    let mut doc = MemoryDocument::new(900.0);
    doc.append(
        MemoryNode::new("nav")
            .with_class("custom-navbar")
            .with_height(60.0)
            .with_margin_bottom(10.0),
    );
    let sidebar = doc.append(MemoryNode::new("div").with_class("sidebar-container"));
    doc.append(
        MemoryNode::new("div")
            .with_class("sidebar-nonparam-container")
            .with_height(200.0),
    );
    let admixture = add_field(&mut doc, "admixture");
    let coords = add_field(&mut doc, "coords");
    let progress = vec![
        doc.append(MemoryNode::new("div").with_class("progress")),
        doc.append(MemoryNode::new("div").with_class("progress")),
    ];
    doc.append(
        MemoryNode::new("ul")
            .with_id("options-pills-container")
            .with_height(30.0),
    );
    let options = doc.append(MemoryNode::new("div").with_class("parameter-options-container"));
    doc.append(MemoryNode::new("ul").with_class("nav-tabs").with_height(40.0));
    let map = doc.append(
        MemoryNode::new("div")
            .with_id("main_plot-admixture_map")
            .with_text("<svg>map</svg>"),
    );
    doc.append(MemoryNode::new("button").with_id("main_plot-dropdown_download_bttn"));
    doc.append(MemoryNode::new("div").with_id("map_download_bttn_display"));
    let bar = doc.append(
        MemoryNode::new("div")
            .with_id("bar_plot-admixture_barplot")
            .with_text("<svg>bar</svg>"),
    );
    doc.append(MemoryNode::new("button").with_id("bar_plot-dropdown_download_bttn"));
    doc.append(MemoryNode::new("div").with_id("bar_download_bttn_display"));
    let carousel = (0..3)
        .map(|_| doc.append(MemoryNode::new("div").with_class("carousel-item")))
        .collect();

    let page = Page {
        admixture,
        coords,
        map,
        bar,
        sidebar,
        options,
        carousel,
        progress,
    };
    (doc, page)
}

fn snapshot(doc: &MemoryDocument) -> Vec<(NodeKey, MemoryNode)> {
    doc.attached().map(|(k, n)| (k, n.clone())).collect()
}

fn field_snapshot(doc: &MemoryDocument, nodes: &FieldNodes, key: &str) -> Vec<MemoryNode> {
    let mut out: Vec<MemoryNode> = [nodes.group, nodes.input, nodes.success, nodes.warning]
        .into_iter()
        .map(|k| doc.node(k).cloned().expect("fixture node"))
        .collect();
    let message = Locator::id(format!("{key}-error-message"));
    out.extend(
        doc.find_all(&message)
            .into_iter()
            .map(|k| doc.node(k).cloned().expect("message node")),
    );
    out
}

fn height(doc: &MemoryDocument, key: NodeKey) -> Option<String> {
    doc.node(key)
        .and_then(|n| n.style(StyleProperty::Height))
        .map(str::to_owned)
}

// ── 1. Isolation ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum FeedbackOp {
    Success,
    Warning(String),
    Clear,
}

fn arb_feedback_op() -> impl Strategy<Value = FeedbackOp> {
    prop_oneof![
        Just(FeedbackOp::Success),
        ".{0,40}".prop_map(FeedbackOp::Warning),
        Just(FeedbackOp::Clear),
    ]
}

fn arb_field() -> impl Strategy<Value = FieldName> {
    prop_oneof![Just(FieldName::Admixture), Just(FieldName::Coordinates)]
}

proptest! {
    #[test]
    fn feedback_never_touches_other_field(
        field in arb_field(),
        ops in proptest::collection::vec(arb_feedback_op(), 1..8),
    ) {
        let (doc, page) = page();
        let other = field.other();
        let before = field_snapshot(&doc, page.field(other), other.dom_key());

        let mut ui = UiController::new(doc, UiConfig::default());
        for op in &ops {
            match op {
                FeedbackOp::Success => ui.present_success(field).expect("success"),
                FeedbackOp::Warning(msg) => ui.present_warning(field, msg).expect("warning"),
                FeedbackOp::Clear => ui.clear_feedback(field).expect("clear"),
            }
        }

        let after = field_snapshot(ui.document(), page.field(other), other.dom_key());
        prop_assert_eq!(before, after);
    }
}

#[test]
fn success_is_idempotent() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    ui.present_success(FieldName::Coordinates).expect("first");
    let once = snapshot(ui.document());
    ui.present_success(FieldName::Coordinates).expect("second");
    assert_eq!(snapshot(ui.document()), once);
    assert!(!ui
        .document()
        .node(page.coords.success)
        .expect("icon")
        .has_class("hidden"));
}

// ── 2. Single verbatim message node ───────────────────────────────────

proptest! {
    #[test]
    fn warning_leaves_one_verbatim_message(
        field in arb_field(),
        messages in proptest::collection::vec(any::<String>(), 1..4),
    ) {
        let (doc, page) = page();
        let mut ui = UiController::new(doc, UiConfig::default());
        for msg in &messages {
            ui.present_warning(field, msg).expect("warning");
        }
        let doc = ui.document();
        let own = Locator::id(format!("{}-error-message", field.dom_key()));
        let other = Locator::id(format!("{}-error-message", field.other().dom_key()));

        let nodes = doc.find_all(&own);
        prop_assert_eq!(nodes.len(), 1);
        let node = doc.node(nodes[0]).expect("message");
        prop_assert_eq!(&node.text, messages.last().expect("non-empty"));
        prop_assert!(!node.raw_markup);
        prop_assert_eq!(doc.next_sibling(page.field(field).group), Some(nodes[0]));
        prop_assert!(doc.find(&other).is_none());
        prop_assert!(!doc.node(page.field(field).warning).expect("icon").has_class("hidden"));
    }
}

#[test]
fn markup_in_message_stays_text() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    let message = r#"<img src=x onerror="alert(1)"> has 3 columns"#;
    ui.present_warning(FieldName::Admixture, message)
        .expect("warning");
    let doc = ui.document();
    let node = doc
        .next_sibling(page.admixture.group)
        .and_then(|k| doc.node(k))
        .expect("message");
    assert_eq!(node.text, message);
    assert!(!node.raw_markup);
}

// ── 3. Plot clearing commutes ─────────────────────────────────────────

#[test]
fn clear_plot_order_does_not_matter() {
    let run = |order: [PlotTarget; 2]| {
        let (doc, _) = page();
        let mut ui = UiController::new(doc, UiConfig::default());
        for target in order {
            ui.dispatch(Trigger::PlotData(target)).expect("clear");
        }
        snapshot(ui.document())
    };
    let map_first = run([PlotTarget::Map, PlotTarget::Bar]);
    let bar_first = run([PlotTarget::Bar, PlotTarget::Map]);
    assert_eq!(map_first, bar_first);

    let (_, page) = page();
    let find = |key: NodeKey| map_first.iter().find(|(k, _)| *k == key).map(|(_, n)| n);
    assert_eq!(find(page.map).expect("map").text, "");
    assert_eq!(find(page.bar).expect("bar").text, "");
    for (_, node) in &map_first {
        if node.tag == "button" || node.id.as_deref().is_some_and(|id| id.ends_with("_display")) {
            assert!(node.has_class("hidden"), "{:?}", node.id);
        }
    }
}

// ── 4. Upload clearing is idempotent ──────────────────────────────────

#[test]
fn clear_uploads_is_idempotent() {
    let (mut doc, page) = page();
    doc.node_mut(page.progress[0])
        .expect("progress")
        .styles
        .insert(StyleProperty::Display, "block".to_owned());

    let mut ui = UiController::new(doc, UiConfig::default());
    let first = ui.clear_uploads().expect("first");
    let once = snapshot(ui.document());
    let second = ui.clear_uploads().expect("second");

    assert_eq!(first, second);
    assert_eq!(first.form_controls, 2);
    assert_eq!(snapshot(ui.document()), once);
    let doc = ui.document();
    for field in FieldName::ALL {
        assert_eq!(doc.node(page.field(field).input).expect("input").value, "");
    }
    for key in &page.progress {
        assert_eq!(
            doc.node(*key).expect("progress").style(StyleProperty::Display),
            Some("none")
        );
    }
}

#[test]
fn clear_uploads_trigger_resets_feedback() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    ui.present_warning(FieldName::Admixture, "bad K").expect("warn");
    ui.present_success(FieldName::Coordinates).expect("ok");

    ui.dispatch(Trigger::ClearUploads).expect("clear");

    let doc = ui.document();
    assert!(doc.find(&Locator::id("admixture-error-message")).is_none());
    for field in FieldName::ALL {
        let nodes = page.field(field);
        assert!(doc.node(nodes.success).expect("icon").has_class("hidden"));
        assert!(doc.node(nodes.warning).expect("icon").has_class("hidden"));
        assert!(doc.node(nodes.input).expect("input").styles.is_empty());
    }
}

#[test]
fn load_sample_data_marks_both_fields_valid() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    ui.present_warning(FieldName::Coordinates, "no header").expect("warn");

    ui.dispatch(Trigger::LoadSampleData).expect("sample");

    let doc = ui.document();
    assert!(doc.find(&Locator::id("coords-error-message")).is_none());
    for field in FieldName::ALL {
        let nodes = page.field(field);
        assert!(!doc.node(nodes.success).expect("icon").has_class("hidden"));
        assert!(doc.node(nodes.warning).expect("icon").has_class("hidden"));
        assert_eq!(
            doc.node(nodes.input).expect("input").style(StyleProperty::BorderColor),
            Some("var(--flatly-success)")
        );
    }
}

// ── 5. Layout math ────────────────────────────────────────────────────

#[test]
fn initial_layout_fills_viewport() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    let report = ui.initial_layout().expect("layout");

    assert_eq!(report.metrics.sidebar, 810.0);
    assert_eq!(report.metrics.options, 555.0);
    assert_eq!(report.metrics.map, 770.0);
    assert_eq!(report.metrics.carousel_item, 765.0);
    assert!(report.missing.is_empty(), "{:?}", report.missing);
    assert_eq!(report.carousel_items, 3);

    let doc = ui.document();
    assert_eq!(height(doc, page.sidebar).as_deref(), Some("810px"));
    assert_eq!(height(doc, page.options).as_deref(), Some("555px"));
    assert_eq!(height(doc, page.map).as_deref(), Some("770px"));
    assert_eq!(height(doc, page.bar).as_deref(), Some("770px"));
    for item in &page.carousel {
        assert_eq!(height(doc, *item).as_deref(), Some("765px"));
    }
    // Initial load keeps whatever the server already rendered.
    assert_eq!(doc.node(page.map).expect("map").text, "<svg>map</svg>");
}

#[test]
fn missing_sidebar_degrades_without_failing() {
    let (mut doc, page) = page();
    let nonparam = doc
        .find(&Locator::class("sidebar-nonparam-container"))
        .expect("fixture");
    admixmap_dom::ElementMutator::remove(&mut doc, &nonparam).expect("remove");
    doc.clear_mutations();

    let mut ui = UiController::new(doc, UiConfig::default());
    let report = ui.initial_layout().expect("layout");

    assert_eq!(report.metrics.options, 755.0);
    assert_eq!(
        report.missing,
        vec![Locator::class("sidebar-nonparam-container")]
    );
    assert_eq!(height(ui.document(), page.options).as_deref(), Some("755px"));
}

// ── 6. Resize always clears plots ─────────────────────────────────────

#[test]
fn every_resize_clears_plots_then_resizes() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    ui.initial_layout().expect("initial");
    let t0 = Instant::now();

    for (i, viewport) in [1000.0, 700.0].into_iter().enumerate() {
        let doc = ui.document_mut();
        doc.set_viewport_height(viewport);
        doc.node_mut(page.map).expect("map").text = "<svg>redrawn</svg>".to_owned();
        doc.node_mut(page.bar).expect("bar").text = "<svg>redrawn</svg>".to_owned();

        let step = ui
            .handle_resize_at(t0 + Duration::from_millis(i as u64 * 500))
            .expect("resize");
        assert!(matches!(step, ResizeStep::Applied(_)), "{step:?}");

        let doc = ui.document();
        assert_eq!(doc.node(page.map).expect("map").text, "");
        assert_eq!(doc.node(page.bar).expect("bar").text, "");
        let main = viewport - 130.0;
        assert_eq!(height(doc, page.map), Some(format!("{main}px")));
        assert_eq!(height(doc, page.bar), Some(format!("{}px", main - 5.0)));
        assert_eq!(height(doc, page.sidebar), Some(format!("{}px", viewport - 90.0)));
    }
}

// ── 7. Batched height writes ──────────────────────────────────────────

#[test]
fn resize_writes_heights_as_one_trailing_batch() {
    let (doc, page) = page();
    let mut ui = UiController::new(doc, UiConfig::default());
    ui.handle_resize_at(Instant::now()).expect("resize");

    let kinds: Vec<_> = ui
        .document()
        .mutations()
        .iter()
        .map(|m| (m.node, m.kind.clone()))
        .collect();
    let (clears, heights) = kinds.split_at(2);
    assert_eq!(
        clears.to_vec(),
        vec![
            (page.map, MutationKind::SetText(String::new())),
            (page.bar, MutationKind::SetText(String::new())),
        ]
    );
    assert_eq!(heights.len(), 4 + page.carousel.len());
    assert!(heights
        .iter()
        .all(|(_, kind)| matches!(kind, MutationKind::SetStyle(StyleProperty::Height, _))));
}

// ── 8. Latest-wins debouncing and layout invariants ───────────────────

proptest! {
    #[test]
    fn last_resize_determines_final_layout(
        events in proptest::collection::vec((0u64..80, 300u32..1600), 1..12),
    ) {
        let config = UiConfig {
            resize: ResizeConfig { delay_ms: 40, hard_deadline_ms: 150 },
            ..UiConfig::default()
        };
        let (doc, page) = page();
        let mut ui = UiController::new(doc, config);
        let mut now = Instant::now();
        let mut last_viewport = 0.0;

        for (gap, viewport) in &events {
            now += Duration::from_millis(*gap);
            last_viewport = f64::from(*viewport);
            ui.document_mut().set_viewport_height(last_viewport);
            ui.handle_resize_at(now).expect("resize");
        }
        ui.tick_at(now + Duration::from_millis(40)).expect("tick");

        prop_assert!(!ui.debouncer().has_pending());
        let expected = format!("{}px", last_viewport - 90.0);
        prop_assert_eq!(height(ui.document(), page.sidebar), Some(expected));
    }

    #[test]
    fn computed_heights_are_never_below_minimum(
        window in 0.0f64..2400.0,
        navbar in 0.0f64..200.0,
        margin in 0.0f64..40.0,
        tabs in 0.0f64..120.0,
        nonparam in 0.0f64..900.0,
        pills in 0.0f64..120.0,
        resize in any::<bool>(),
    ) {
        let m = LayoutMeasurements {
            window_height: window,
            navbar_height: navbar,
            navbar_margin: margin,
            nav_tabs_height: tabs,
            nonparam_height: nonparam,
            pills_height: pills,
        };
        let phase = if resize { LayoutPhase::Resize } else { LayoutPhase::Initial };
        let metrics = LayoutMetrics::compute(&m, &Default::default(), phase);
        for panel in admixmap_ui::Panel::ALL {
            prop_assert!(metrics.height(panel) >= 0.0, "{} negative", panel.as_str());
        }
        if metrics.clamped.is_empty() {
            prop_assert_eq!(metrics.sidebar, window - navbar - margin - 20.0);
            prop_assert_eq!(metrics.carousel_item, metrics.map - 5.0);
        }
    }
}
