#![forbid(unsafe_code)]
#![doc = "Collaborator traits for boxscope: document queries, node identity, notifications, presentation, and time."]
#![doc = ""]
#![doc = "This crate defines the boundary between the inspection engine (`boxscope-web`)"]
#![doc = "and the environment that hosts it: a live document, the host's node registry,"]
#![doc = "its event bus, and whatever draws the overlay surfaces."]

use core::time::Duration;

use boxscope_core::{ComputedStyle, NodeId, Point, Rect, SurfaceId, SurfaceStyle};

/// What a node offers for highlighting.
#[derive(Debug, Clone)]
pub enum NodeSurface {
    /// An element: its border box in viewport coordinates plus its computed style.
    Element {
        border_box: Rect,
        style: ComputedStyle,
    },
    /// A text node: bounding rectangle of the range spanning its content.
    TextRange(Rect),
    /// Comments, documents, detached nodes: nothing to draw.
    None,
}

/// Read-only document queries.
///
/// On the web this wraps `getComputedStyle`, `getBoundingClientRect`,
/// `Range.getBoundingClientRect`, and `document.elementFromPoint`.
pub trait SurfaceProvider {
    /// Live node reference.
    type Node: Clone;

    /// Highlightable surface of `node`.
    fn surface(&self, node: &Self::Node) -> NodeSurface;

    /// Topmost element at a client-coordinate point.
    fn element_from_point(&self, client: Point) -> Option<Self::Node>;

    /// Document scroll offset; added to viewport rectangles to place the
    /// absolutely positioned overlay container.
    fn scroll_offset(&self) -> Point {
        Point::default()
    }
}

/// Bidirectional mapping between live nodes and stable identities.
///
/// Owned by the host; the overlay only asks.
pub trait NodeRegistry {
    /// Live node reference.
    type Node: Clone;

    /// Identity of `node`, minting one on first sight.
    fn get_or_create_node_id(&mut self, node: &Self::Node) -> NodeId;

    /// Node for a previously minted identity.
    fn get_node(&self, id: NodeId) -> Option<Self::Node>;
}

/// Outbound notifications to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayNotification {
    /// The pointer moved onto a node while inspecting.
    NodeHighlightRequested { node_id: NodeId },
    /// The user committed a node with a click or tap.
    InspectNodeRequested { backend_node_id: NodeId },
}

impl OverlayNotification {
    /// Protocol method name.
    pub const fn method(&self) -> &'static str {
        match self {
            Self::NodeHighlightRequested { .. } => "Overlay.nodeHighlightRequested",
            Self::InspectNodeRequested { .. } => "Overlay.inspectNodeRequested",
        }
    }

    /// Node the notification refers to.
    pub const fn node(&self) -> NodeId {
        match self {
            Self::NodeHighlightRequested { node_id } => *node_id,
            Self::InspectNodeRequested { backend_node_id } => *backend_node_id,
        }
    }
}

/// Event sink for outbound notifications (the host's connector).
pub trait NotificationSink {
    /// Deliver one notification.
    fn trigger(&mut self, notification: OverlayNotification);
}

/// Presentation abstraction for overlay surfaces and the viewport indicator.
///
/// Surfaces are created once and then only re-styled, shown, or hidden.
pub trait OverlayPresenter {
    /// Platform-specific error type.
    type Error: core::fmt::Debug + core::fmt::Display;

    /// Create a surface with its stacking order. Called once per surface.
    fn create_surface(&mut self, id: SurfaceId, z_index: i32) -> Result<(), Self::Error>;

    /// Apply dynamic style to a surface.
    fn apply_style(&mut self, id: SurfaceId, style: &SurfaceStyle) -> Result<(), Self::Error>;

    /// Show or hide a surface without destroying it.
    fn set_visible(&mut self, id: SurfaceId, visible: bool) -> Result<(), Self::Error>;

    /// Replace the viewport indicator's text.
    fn set_indicator_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Insert the viewport indicator into the document.
    fn insert_indicator(&mut self) -> Result<(), Self::Error>;

    /// Remove the viewport indicator from the document.
    fn remove_indicator(&mut self) -> Result<(), Self::Error>;
}

/// Monotonic clock abstraction.
///
/// The engine never reads wall time directly; debounce deadlines are computed
/// against this clock so tests can drive it explicitly.
pub trait OverlayClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Unified backend combining every collaborator.
///
/// The inspection controller is generic over this trait.
pub trait InspectBackend {
    /// Live node reference shared by provider and registry.
    type Node: Clone;

    /// Clock implementation.
    type Clock: OverlayClock;

    /// Document query implementation.
    type Provider: SurfaceProvider<Node = Self::Node>;

    /// Node identity implementation.
    type Registry: NodeRegistry<Node = Self::Node>;

    /// Notification sink implementation.
    type Sink: NotificationSink;

    /// Presenter implementation.
    type Presenter: OverlayPresenter;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// Access the document.
    fn provider(&self) -> &Self::Provider;

    /// Access the node registry.
    fn registry(&mut self) -> &mut Self::Registry;

    /// Access the notification sink.
    fn sink(&mut self) -> &mut Self::Sink;

    /// Access the presenter.
    fn presenter(&mut self) -> &mut Self::Presenter;
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt;

    // -----------------------------------------------------------------------
    // OverlayNotification tests
    // -----------------------------------------------------------------------

    #[test]
    fn notification_methods() {
        let hover = OverlayNotification::NodeHighlightRequested { node_id: NodeId(4) };
        let commit = OverlayNotification::InspectNodeRequested {
            backend_node_id: NodeId(9),
        };
        assert_eq!(hover.method(), "Overlay.nodeHighlightRequested");
        assert_eq!(commit.method(), "Overlay.inspectNodeRequested");
        assert_eq!(hover.node(), NodeId(4));
        assert_eq!(commit.node(), NodeId(9));
    }

    // -----------------------------------------------------------------------
    // Mock implementations for trait testing
    // -----------------------------------------------------------------------

    struct TestClock {
        elapsed: Duration,
    }

    impl OverlayClock for TestClock {
        fn now_mono(&self) -> Duration {
            self.elapsed
        }
    }

    #[derive(Debug)]
    struct TestError(String);

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "TestError: {}", self.0)
        }
    }

    struct TestDocument {
        boxes: Vec<Rect>,
    }

    impl SurfaceProvider for TestDocument {
        type Node = usize;

        fn surface(&self, node: &usize) -> NodeSurface {
            match self.boxes.get(*node) {
                Some(rect) => NodeSurface::Element {
                    border_box: *rect,
                    style: ComputedStyle::new(),
                },
                None => NodeSurface::None,
            }
        }

        fn element_from_point(&self, client: Point) -> Option<usize> {
            self.boxes.iter().rposition(|rect| rect.contains(client))
        }
    }

    struct TestRegistry;

    impl NodeRegistry for TestRegistry {
        type Node = usize;

        fn get_or_create_node_id(&mut self, node: &usize) -> NodeId {
            NodeId(*node as u64 + 1)
        }

        fn get_node(&self, id: NodeId) -> Option<usize> {
            id.0.checked_sub(1).map(|raw| raw as usize)
        }
    }

    #[derive(Default)]
    struct TestSink {
        received: Vec<OverlayNotification>,
    }

    impl NotificationSink for TestSink {
        fn trigger(&mut self, notification: OverlayNotification) {
            self.received.push(notification);
        }
    }

    #[derive(Default)]
    struct TestPresenter {
        created: Vec<(SurfaceId, i32)>,
        fail_styles: bool,
        indicator: Option<String>,
        indicator_text: String,
    }

    impl OverlayPresenter for TestPresenter {
        type Error = TestError;

        fn create_surface(&mut self, id: SurfaceId, z_index: i32) -> Result<(), TestError> {
            self.created.push((id, z_index));
            Ok(())
        }

        fn apply_style(&mut self, id: SurfaceId, _style: &SurfaceStyle) -> Result<(), TestError> {
            if self.fail_styles {
                return Err(TestError(format!("cannot style {}", id.name())));
            }
            Ok(())
        }

        fn set_visible(&mut self, _id: SurfaceId, _visible: bool) -> Result<(), TestError> {
            Ok(())
        }

        fn set_indicator_text(&mut self, text: &str) -> Result<(), TestError> {
            self.indicator_text = text.to_string();
            Ok(())
        }

        fn insert_indicator(&mut self) -> Result<(), TestError> {
            self.indicator = Some(self.indicator_text.clone());
            Ok(())
        }

        fn remove_indicator(&mut self) -> Result<(), TestError> {
            self.indicator = None;
            Ok(())
        }
    }

    struct TestBackend {
        clock: TestClock,
        document: TestDocument,
        registry: TestRegistry,
        sink: TestSink,
        presenter: TestPresenter,
    }

    impl InspectBackend for TestBackend {
        type Node = usize;
        type Clock = TestClock;
        type Provider = TestDocument;
        type Registry = TestRegistry;
        type Sink = TestSink;
        type Presenter = TestPresenter;

        fn clock(&self) -> &TestClock {
            &self.clock
        }

        fn provider(&self) -> &TestDocument {
            &self.document
        }

        fn registry(&mut self) -> &mut TestRegistry {
            &mut self.registry
        }

        fn sink(&mut self) -> &mut TestSink {
            &mut self.sink
        }

        fn presenter(&mut self) -> &mut TestPresenter {
            &mut self.presenter
        }
    }

    fn backend() -> TestBackend {
        TestBackend {
            clock: TestClock {
                elapsed: Duration::from_millis(250),
            },
            document: TestDocument {
                boxes: vec![
                    Rect::new(0.0, 0.0, 100.0, 100.0),
                    Rect::new(10.0, 10.0, 20.0, 20.0),
                ],
            },
            registry: TestRegistry,
            sink: TestSink::default(),
            presenter: TestPresenter::default(),
        }
    }

    #[test]
    fn clock_reports_elapsed() {
        assert_eq!(backend().clock().now_mono(), Duration::from_millis(250));
    }

    #[test]
    fn provider_hit_tests_topmost() {
        let backend = backend();
        assert_eq!(backend.provider().element_from_point(Point::new(15.0, 15.0)), Some(1));
        assert_eq!(backend.provider().element_from_point(Point::new(50.0, 50.0)), Some(0));
        assert_eq!(backend.provider().element_from_point(Point::new(150.0, 50.0)), None);
        assert_eq!(backend.provider().scroll_offset(), Point::default());
    }

    #[test]
    fn provider_surface_variants() {
        let backend = backend();
        assert!(matches!(
            backend.provider().surface(&1),
            NodeSurface::Element { border_box, .. } if border_box == Rect::new(10.0, 10.0, 20.0, 20.0)
        ));
        assert!(matches!(backend.provider().surface(&7), NodeSurface::None));
    }

    #[test]
    fn registry_round_trip() {
        let mut backend = backend();
        let id = backend.registry().get_or_create_node_id(&1);
        assert_eq!(backend.registry().get_node(id), Some(1));
    }

    #[test]
    fn sink_collects_notifications() {
        let mut backend = backend();
        backend
            .sink()
            .trigger(OverlayNotification::NodeHighlightRequested { node_id: NodeId(2) });
        assert_eq!(backend.sink.received.len(), 1);
    }

    #[test]
    fn presenter_surfaces_and_indicator() {
        let mut backend = backend();
        let presenter = backend.presenter();
        for layer in SurfaceId::LAYERS {
            presenter
                .create_surface(layer, layer.default_z_index())
                .unwrap();
        }
        assert_eq!(presenter.created.len(), 4);

        presenter.set_indicator_text("800px × 600px").unwrap();
        presenter.insert_indicator().unwrap();
        assert_eq!(presenter.indicator.as_deref(), Some("800px × 600px"));
        presenter.remove_indicator().unwrap();
        assert!(presenter.indicator.is_none());
    }

    #[test]
    fn presenter_error_display() {
        let mut presenter = TestPresenter {
            fail_styles: true,
            ..TestPresenter::default()
        };
        let err = presenter
            .apply_style(SurfaceId::Border, &SurfaceStyle::collapsed())
            .unwrap_err();
        assert_eq!(err.to_string(), "TestError: cannot style border");
        assert!(presenter.set_visible(SurfaceId::Container, false).is_ok());
    }
}
