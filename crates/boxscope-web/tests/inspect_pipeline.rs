#![forbid(unsafe_code)]

//! End-to-end pipeline tests against the fixture backend.
//!
//! Covers:
//! - box-model arithmetic reaching the presenter unchanged
//! - mode gating (no geometry work, no notifications while `none`)
//! - commit semantics (one notification, overlay hidden, event suppressed)
//! - viewport indicator debounce
//! - protocol messages driving the controller
//! - structured logging of each dispatch
//!
//! Run:
//!   cargo test -p boxscope-web --test inspect_pipeline

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use boxscope_backend::{InspectBackend, NodeRegistry, OverlayNotification};
use boxscope_core::{ColorSpec, PointerEvent, Point, Rect, ResizeEvent, SurfaceId, TouchList, TouchPoint};
use boxscope_web::fixture::{FixtureBackend, FixtureDocument, FixtureNode, PresenterOp};
use boxscope_web::{
    CommandOutcome, HighlightConfig, HighlightOutcome, IndicatorUpdate, InspectController,
    InspectMode, InspectSettings, OverlayConfig, PointerOutcome, parse_command,
};
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Helpers
// ============================================================================

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn active_settings() -> InspectSettings {
    InspectSettings::new(
        InspectMode::SearchForNode,
        HighlightConfig {
            margin_color: Some(ColorSpec::rgba(246, 178, 107, 0.66)),
            border_color: Some(ColorSpec::rgba(255, 229, 153, 0.66)),
            padding_color: Some(ColorSpec::rgba(147, 196, 125, 0.55)),
            content_color: Some(ColorSpec::rgba(111, 168, 220, 0.66)),
        },
    )
}

struct Page {
    controller: InspectController<FixtureBackend>,
    card: FixtureNode,
    label: FixtureNode,
}

fn page_with(config: OverlayConfig) -> Page {
    let mut doc = FixtureDocument::new();
    let card = doc.add_element(Rect::new(10.0, 10.0, 100.0, 50.0), 4.0, 2.0, 5.0);
    let label = doc.add_text(Rect::new(20.0, 20.0, 40.0, 12.0));
    let controller = InspectController::new(FixtureBackend::new(doc), config).unwrap();
    Page {
        controller,
        card,
        label,
    }
}

fn page() -> Page {
    page_with(OverlayConfig::default())
}

fn presented_rect(ctl: &InspectController<FixtureBackend>, surface: SurfaceId) -> Option<Rect> {
    ctl.backend().recorder().style(surface).map(|s| s.rect)
}

// ============================================================================
// Geometry through the presenter
// ============================================================================

#[test]
fn bordered_padded_element_content_box() {
    let Page {
        mut controller,
        card,
        ..
    } = page();
    let id = controller.backend_mut().registry().get_or_create_node_id(&card);

    let outcome = controller.highlight_node(id, &active_settings().highlight_config);
    let HighlightOutcome::Painted(geometry) = outcome else {
        panic!("expected a painted highlight, got {outcome:?}");
    };
    assert_eq!(geometry.content_rect(), Rect::new(17.0, 17.0, 86.0, 36.0));

    assert_eq!(
        presented_rect(&controller, SurfaceId::Container),
        Some(Rect::new(10.0, 10.0, 100.0, 50.0))
    );
    assert_eq!(
        presented_rect(&controller, SurfaceId::Margin),
        Some(Rect::new(-4.0, -4.0, 108.0, 58.0))
    );
    assert_eq!(
        presented_rect(&controller, SurfaceId::Padding),
        Some(Rect::new(2.0, 2.0, 96.0, 46.0))
    );
    assert_eq!(
        presented_rect(&controller, SurfaceId::Content),
        Some(Rect::new(7.0, 7.0, 86.0, 36.0))
    );
    assert!(controller.backend().recorder().is_visible(SurfaceId::Container));
}

#[test]
fn text_node_highlight_collapses_frames() {
    let Page {
        mut controller,
        label,
        ..
    } = page();
    let id = controller.backend_mut().registry().get_or_create_node_id(&label);
    controller.highlight_node(id, &active_settings().highlight_config);

    assert_eq!(
        presented_rect(&controller, SurfaceId::Container),
        Some(Rect::new(20.0, 20.0, 40.0, 12.0))
    );
    for surface in [SurfaceId::Margin, SurfaceId::Border, SurfaceId::Padding] {
        assert_eq!(presented_rect(&controller, surface), Some(Rect::ZERO));
    }
    let content = controller
        .backend()
        .recorder()
        .style(SurfaceId::Content)
        .copied()
        .unwrap();
    assert_eq!(content.rect, Rect::new(0.0, 0.0, 40.0, 12.0));
    assert_eq!(content.to_css(), "left:0px;top:0px;width:40px;height:12px;border:0;background:rgba(111,168,220,0.66)");
}

#[test]
fn scrolled_document_offsets_container_only() {
    let Page {
        mut controller,
        card,
        ..
    } = page();
    controller
        .backend_mut()
        .document_mut()
        .set_scroll(Point::new(0.0, 250.0));
    let id = controller.backend_mut().registry().get_or_create_node_id(&card);
    controller.highlight_node(id, &HighlightConfig::default());

    assert_eq!(
        presented_rect(&controller, SurfaceId::Container),
        Some(Rect::new(10.0, 260.0, 100.0, 50.0))
    );
    assert_eq!(
        presented_rect(&controller, SurfaceId::Border),
        Some(Rect::new(0.0, 0.0, 100.0, 50.0))
    );
}

#[test]
fn installed_surfaces_carry_static_css() {
    let Page { controller, .. } = page();
    let recorder = controller.backend().recorder();
    assert_eq!(
        recorder.base_css(SurfaceId::Container),
        Some("position:absolute;pointer-events:none")
    );
    for (layer, z) in SurfaceId::LAYERS.into_iter().zip([100, 200, 300, 400]) {
        assert_eq!(
            recorder.base_css(layer),
            Some(format!("position:absolute;box-sizing:border-box;z-index:{z}").as_str())
        );
    }
}

#[test]
fn absent_alpha_paints_transparent_frames() {
    let Page {
        mut controller,
        card,
        ..
    } = page();
    let id = controller.backend_mut().registry().get_or_create_node_id(&card);
    let config = HighlightConfig {
        border_color: Some(ColorSpec::rgb(255, 0, 0)),
        ..HighlightConfig::default()
    };
    controller.highlight_node(id, &config);

    let border = controller
        .backend()
        .recorder()
        .style(SurfaceId::Border)
        .copied()
        .unwrap();
    assert!(border.frame.unwrap().color.is_transparent());
    assert!(border.to_css().contains("border-top:2px solid rgba(255,0,0,0)"));
}

// ============================================================================
// Mode gating
// ============================================================================

#[test]
fn inactive_move_does_no_geometry_work() {
    let Page { mut controller, .. } = page();
    let dispatch = controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));

    assert!(dispatch.is_ignored());
    assert_eq!(dispatch.notification, None);
    assert_eq!(controller.backend().document().surface_queries(), 0);
    assert!(controller.backend().node_registry().is_empty());
    assert!(controller.backend().notifications().received().is_empty());
}

#[test]
fn returning_to_none_stops_pipeline() {
    let Page { mut controller, .. } = page();
    controller.set_inspect_mode(active_settings());
    controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
    controller.set_inspect_mode(InspectSettings::default());

    let queries = controller.backend().document().surface_queries();
    let dispatch = controller.dispatch_pointer(&PointerEvent::mouse_move(30.0, 30.0));
    assert!(dispatch.is_ignored());
    assert_eq!(controller.backend().document().surface_queries(), queries);
    assert_eq!(controller.backend().notifications().received().len(), 1);
}

#[test]
fn unrecognized_mode_is_active() {
    let Page { mut controller, .. } = page();
    controller.set_inspect_mode(InspectSettings::new(
        InspectMode::parse("highlightHover"),
        HighlightConfig::default(),
    ));
    let dispatch = controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
    assert_eq!(dispatch.outcome(), PointerOutcome::Highlighted);
}

#[test]
fn hover_sequence_retargets_overlay() {
    let mut doc = FixtureDocument::new();
    let left = doc.add_element(Rect::new(0.0, 0.0, 50.0, 50.0), 0.0, 0.0, 0.0);
    let right = doc.add_element(Rect::new(60.0, 0.0, 50.0, 50.0), 0.0, 1.0, 0.0);
    let mut controller =
        InspectController::new(FixtureBackend::new(doc), OverlayConfig::default()).unwrap();
    controller.set_inspect_mode(active_settings());

    controller.dispatch_pointer(&PointerEvent::mouse_move(10.0, 10.0));
    controller.dispatch_pointer(&PointerEvent::mouse_move(70.0, 10.0));
    controller.dispatch_pointer(&PointerEvent::mouse_move(12.0, 10.0));

    let registry = controller.backend().node_registry();
    let (left_id, right_id) = (registry.id_of(left).unwrap(), registry.id_of(right).unwrap());
    let received: Vec<_> = controller
        .backend()
        .notifications()
        .received()
        .iter()
        .map(OverlayNotification::node)
        .collect();
    assert_eq!(received, vec![left_id, right_id, left_id]);
    assert_eq!(
        presented_rect(&controller, SurfaceId::Container),
        Some(Rect::new(0.0, 0.0, 50.0, 50.0))
    );
}

// ============================================================================
// Commit
// ============================================================================

#[test]
fn click_emits_one_inspect_and_hides() {
    let Page {
        mut controller,
        card,
        ..
    } = page();
    controller.set_inspect_mode(active_settings());
    controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
    controller.backend_mut().recorder_mut().clear_ops();

    let dispatch = controller.dispatch_pointer(&PointerEvent::click(20.0, 20.0));
    let id = controller.backend().node_registry().id_of(card).unwrap();

    assert_eq!(dispatch.outcome(), PointerOutcome::Inspected);
    assert!(dispatch.disposition.prevent_default);
    assert!(dispatch.disposition.stop_immediate_propagation);
    let inspects: Vec<_> = controller
        .backend()
        .notifications()
        .received()
        .iter()
        .filter(|n| matches!(n, OverlayNotification::InspectNodeRequested { .. }))
        .copied()
        .collect();
    assert_eq!(
        inspects,
        vec![OverlayNotification::InspectNodeRequested {
            backend_node_id: id
        }]
    );
    assert!(!controller.renderer().is_visible());
    assert_eq!(
        controller.backend().recorder().ops(),
        &[PresenterOp::Visible {
            surface: SurfaceId::Container,
            visible: false
        }]
    );
}

#[test]
fn inactive_click_passes_through() {
    let Page { mut controller, .. } = page();
    let dispatch = controller.dispatch_pointer(&PointerEvent::click(20.0, 20.0));
    assert!(!dispatch.disposition.prevent_default);
    assert!(controller.backend().notifications().received().is_empty());
}

#[test]
fn touch_sequence_on_touch_device() {
    let Page {
        mut controller,
        card,
        ..
    } = page_with(OverlayConfig::touch());
    controller.set_inspect_mode(active_settings());

    let start = controller.dispatch_pointer(&PointerEvent::TouchStart(TouchList::single(
        TouchPoint::new(1, 15.0, 15.0),
    )));
    let end = controller.dispatch_pointer(&PointerEvent::TouchEnd(TouchList::lifted(
        TouchPoint::new(1, 15.0, 15.0),
    )));
    let id = controller.backend().node_registry().id_of(card).unwrap();

    assert_eq!(start.outcome(), PointerOutcome::Highlighted);
    assert_eq!(end.outcome(), PointerOutcome::Inspected);
    assert_eq!(
        controller.backend().notifications().received(),
        &[
            OverlayNotification::NodeHighlightRequested { node_id: id },
            OverlayNotification::InspectNodeRequested {
                backend_node_id: id
            },
        ]
    );
    assert_eq!(start.log.sequence, Some(1));
    assert_eq!(end.log.sequence, Some(2));
}

// ============================================================================
// Viewport indicator
// ============================================================================

#[test]
fn resizes_500ms_apart_keep_indicator() {
    let Page { mut controller, .. } = page();
    controller.set_show_viewport_size_on_resize(true);

    assert_eq!(
        controller.dispatch_resize(ResizeEvent::new(800, 600)),
        IndicatorUpdate::Inserted
    );
    controller.backend_mut().clock_mut().advance(ms(500));
    assert!(!controller.tick());
    assert_eq!(
        controller.dispatch_resize(ResizeEvent::new(820, 600)),
        IndicatorUpdate::Refreshed
    );
    controller.backend_mut().clock_mut().advance(ms(500));
    assert!(!controller.tick());
    assert_eq!(
        controller.backend().recorder().indicator(),
        Some("820px × 600px")
    );

    let inserts = controller
        .backend()
        .recorder()
        .ops()
        .iter()
        .filter(|op| matches!(op, PresenterOp::InsertIndicator))
        .count();
    assert_eq!(inserts, 1);
}

#[test]
fn one_second_of_silence_removes_indicator() {
    let Page { mut controller, .. } = page();
    controller.set_show_viewport_size_on_resize(true);
    controller.dispatch_resize(ResizeEvent::new(1024, 768));

    controller.backend_mut().clock_mut().advance(ms(999));
    assert!(!controller.tick());
    controller.backend_mut().clock_mut().advance(ms(1));
    assert!(controller.tick());
    assert_eq!(controller.backend().recorder().indicator(), None);
    assert_eq!(controller.renderer().indicator_text(), None);

    // The next resize inserts it again.
    assert_eq!(
        controller.dispatch_resize(ResizeEvent::new(1024, 700)),
        IndicatorUpdate::Inserted
    );
}

#[test]
fn indicator_ignores_inspect_mode() {
    let Page { mut controller, .. } = page();
    controller.set_show_viewport_size_on_resize(true);
    assert!(!controller.state().is_active());
    assert_eq!(
        controller.dispatch_resize(ResizeEvent::new(640, 480)),
        IndicatorUpdate::Inserted
    );
}

#[test]
fn configured_idle_timeout() {
    let Page { mut controller, .. } = page_with(OverlayConfig {
        indicator_idle_ms: 250,
        show_viewport_size_on_resize: true,
        ..OverlayConfig::default()
    });
    controller.dispatch_resize(ResizeEvent::new(640, 480));
    controller.backend_mut().clock_mut().advance(ms(250));
    assert!(controller.tick());
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn protocol_messages_drive_controller() {
    let Page {
        mut controller,
        card,
        ..
    } = page();

    let messages = [
        r#"{"method":"Overlay.setInspectMode","params":{"mode":"searchForNode","highlightConfig":{"contentColor":{"r":111,"g":168,"b":220,"a":0.66}}}}"#,
        r#"{"method":"Overlay.setShowViewportSizeOnResize","params":{"show":true}}"#,
    ];
    for message in messages {
        let command = parse_command(message).unwrap().unwrap();
        assert_eq!(controller.execute(command), CommandOutcome::Applied);
    }
    assert!(controller.state().is_active());
    assert!(controller.show_viewport_size_on_resize());

    let id = controller.backend_mut().registry().get_or_create_node_id(&card);
    let highlight = format!(
        r#"{{"method":"Overlay.highlightNode","params":{{"nodeId":{},"highlightConfig":{{}}}}}}"#,
        id.0
    );
    let outcome = controller.execute(parse_command(&highlight).unwrap().unwrap());
    assert!(matches!(
        outcome,
        CommandOutcome::Highlight(HighlightOutcome::Painted(_))
    ));
    assert!(controller.renderer().is_visible());

    let hide = parse_command(r#"{"method":"Overlay.hideHighlight"}"#).unwrap().unwrap();
    assert_eq!(controller.execute(hide), CommandOutcome::Hidden);
    assert!(!controller.renderer().is_visible());
}

#[test]
fn out_of_range_color_channels_still_activate_inspection() {
    let Page { mut controller, .. } = page();
    let message = r#"{"method":"Overlay.setInspectMode","params":{"mode":"searchForNode","highlightConfig":{"contentColor":{"r":300,"g":-1,"b":127.5,"a":0.66}}}}"#;
    let command = parse_command(message).unwrap().unwrap();
    assert_eq!(controller.execute(command), CommandOutcome::Applied);
    assert!(controller.state().is_active());

    let dispatch = controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
    assert_eq!(dispatch.outcome(), PointerOutcome::Highlighted);
    let content = controller
        .backend()
        .recorder()
        .style(SurfaceId::Content)
        .copied()
        .unwrap();
    assert_eq!(content.fill.unwrap().to_css(), "rgba(255,0,128,0.66)");
}

#[test]
fn notifications_as_jsonl() {
    let Page { mut controller, .. } = page();
    controller.set_inspect_mode(active_settings());
    controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
    controller.dispatch_pointer(&PointerEvent::click(20.0, 20.0));

    let jsonl = controller.backend().notifications().to_jsonl();
    let lines: Vec<&str> = jsonl.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"method":"Overlay.nodeHighlightRequested","params":{"nodeId":1}}"#,
            r#"{"method":"Overlay.inspectNodeRequested","params":{"backendNodeId":1}}"#,
        ]
    );
}

// ============================================================================
// Structured logging
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent_span_name,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

#[test]
fn dispatches_are_logged_inside_span() {
    let events = with_captured_events(|| {
        let Page { mut controller, .. } = page();
        controller.set_inspect_mode(active_settings());
        controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
        controller.dispatch_pointer(&PointerEvent::click(500.0, 500.0));
    });

    let dispatches: Vec<_> = events
        .iter()
        .filter(|e| e.fields.get("message").map(String::as_str) == Some("pointer dispatch"))
        .collect();
    assert_eq!(dispatches.len(), 2);
    for event in &dispatches {
        assert_eq!(event.level, tracing::Level::DEBUG);
        assert_eq!(event.parent_span_name.as_deref(), Some("overlay.dispatch"));
        assert!(event.fields.contains_key("phase"));
    }
    assert_eq!(
        dispatches[0].fields.get("outcome").map(String::as_str),
        Some("highlighted")
    );
    assert_eq!(dispatches[0].fields.get("node_id").map(String::as_str), Some("1"));
    assert_eq!(
        dispatches[1].fields.get("outcome").map(String::as_str),
        Some("nothing_under_pointer")
    );
}

#[test]
fn presenter_failure_logs_warning() {
    let events = with_captured_events(|| {
        let Page { mut controller, .. } = page();
        controller.set_inspect_mode(active_settings());
        controller.backend_mut().recorder_mut().fail_styles(true);
        let dispatch = controller.dispatch_pointer(&PointerEvent::mouse_move(20.0, 20.0));
        assert_eq!(dispatch.outcome(), PointerOutcome::Degraded);
    });

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(
        warnings[0]
            .fields
            .get("error")
            .is_some_and(|e| e.contains("cannot style container"))
    );
}

#[test]
fn mode_transitions_are_logged() {
    let events = with_captured_events(|| {
        let Page { mut controller, .. } = page();
        controller.set_inspect_mode(active_settings());
        controller.set_inspect_mode(InspectSettings::default());
    });

    let changes: Vec<_> = events
        .iter()
        .filter(|e| e.fields.get("message").map(String::as_str) == Some("inspect mode changed"))
        .collect();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].fields.get("to").map(String::as_str), Some("searchForNode"));
    assert_eq!(changes[0].fields.get("activated").map(String::as_str), Some("true"));
    assert_eq!(changes[0].fields.get("deactivated").map(String::as_str), Some("false"));
    assert_eq!(changes[1].fields.get("activated").map(String::as_str), Some("false"));
    assert_eq!(changes[1].fields.get("deactivated").map(String::as_str), Some("true"));
}
