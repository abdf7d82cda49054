#![forbid(unsafe_code)]

//! Synthetic backend for driving the controller without a browser.
//!
//! [`FixtureDocument`] is a flat list of nodes with fixed boxes;
//! [`FixtureRegistry`] mints identities on first sight;
//! [`RecordingPresenter`] and [`RecordingSink`] record everything the
//! controller asks of them. All of it is deterministic, which makes it
//! suitable for tests, benches, and replaying host traces.

use core::cell::Cell;
use core::fmt;

use ahash::AHashMap;
use boxscope_backend::{
    InspectBackend, NodeRegistry, NodeSurface, NotificationSink, OverlayNotification,
    OverlayPresenter, SurfaceProvider,
};
use boxscope_core::{ComputedStyle, Edges, NodeId, NodeKind, Point, Rect, SurfaceId, SurfaceStyle};

use crate::DeterministicClock;
use crate::protocol::notification_to_json;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Handle to a node in a [`FixtureDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureNode(pub usize);

#[derive(Debug, Clone)]
struct FixtureNodeData {
    kind: NodeKind,
    rect: Rect,
    style: ComputedStyle,
    attached: bool,
}

/// In-memory document with fixed geometry.
///
/// Hit testing returns the most recently added attached element containing
/// the point, so later elements stack above earlier ones.
#[derive(Debug, Default)]
pub struct FixtureDocument {
    nodes: Vec<FixtureNodeData>,
    scroll: Point,
    surface_queries: Cell<usize>,
}

impl FixtureDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, rect: Rect, style: ComputedStyle) -> FixtureNode {
        self.nodes.push(FixtureNodeData {
            kind,
            rect,
            style,
            attached: true,
        });
        FixtureNode(self.nodes.len() - 1)
    }

    /// Add an element with uniform-per-side margin, border, and padding.
    pub fn add_element(
        &mut self,
        border_box: Rect,
        margin: impl Into<Edges>,
        border: impl Into<Edges>,
        padding: impl Into<Edges>,
    ) -> FixtureNode {
        let style = ComputedStyle::from_box_edges(margin.into(), border.into(), padding.into());
        self.push(NodeKind::Element, border_box, style)
    }

    /// Add an element with an explicit computed style.
    pub fn add_element_with_style(&mut self, border_box: Rect, style: ComputedStyle) -> FixtureNode {
        self.push(NodeKind::Element, border_box, style)
    }

    /// Add a text node whose range covers `rect`.
    pub fn add_text(&mut self, rect: Rect) -> FixtureNode {
        self.push(NodeKind::Text, rect, ComputedStyle::new())
    }

    /// Add a node of any other kind (comment, document, ...).
    pub fn add_node(&mut self, kind: NodeKind) -> FixtureNode {
        self.push(kind, Rect::ZERO, ComputedStyle::new())
    }

    /// Remove a node from the document; it keeps its identity but has no box.
    pub fn detach(&mut self, node: FixtureNode) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.attached = false;
        }
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    /// Number of [`SurfaceProvider::surface`] calls served so far.
    #[must_use]
    pub fn surface_queries(&self) -> usize {
        self.surface_queries.get()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SurfaceProvider for FixtureDocument {
    type Node = FixtureNode;

    fn surface(&self, node: &FixtureNode) -> NodeSurface {
        self.surface_queries.set(self.surface_queries.get() + 1);
        let Some(data) = self
            .nodes
            .get(node.0)
            .filter(|data| data.attached && data.kind.is_highlightable())
        else {
            return NodeSurface::None;
        };
        if data.kind == NodeKind::Element {
            NodeSurface::Element {
                border_box: data.rect,
                style: data.style.clone(),
            }
        } else {
            NodeSurface::TextRange(data.rect)
        }
    }

    fn element_from_point(&self, client: Point) -> Option<FixtureNode> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, data)| {
                data.attached && data.kind == NodeKind::Element && data.rect.contains(client)
            })
            .map(|(index, _)| FixtureNode(index))
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Node registry minting sequential identities starting at `1`.
#[derive(Debug)]
pub struct FixtureRegistry {
    ids: AHashMap<FixtureNode, NodeId>,
    nodes: AHashMap<NodeId, FixtureNode>,
    next_id: u64,
}

impl Default for FixtureRegistry {
    fn default() -> Self {
        Self {
            ids: AHashMap::new(),
            nodes: AHashMap::new(),
            next_id: 1,
        }
    }
}

impl FixtureRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of `node` if it has been seen.
    #[must_use]
    pub fn id_of(&self, node: FixtureNode) -> Option<NodeId> {
        self.ids.get(&node).copied()
    }

    /// Number of minted identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl NodeRegistry for FixtureRegistry {
    type Node = FixtureNode;

    fn get_or_create_node_id(&mut self, node: &FixtureNode) -> NodeId {
        if let Some(id) = self.ids.get(node) {
            return *id;
        }
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.ids.insert(*node, id);
        self.nodes.insert(id, *node);
        id
    }

    fn get_node(&self, id: NodeId) -> Option<FixtureNode> {
        self.nodes.get(&id).copied()
    }
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Notification sink that keeps every notification in order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    received: Vec<OverlayNotification>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn received(&self) -> &[OverlayNotification] {
        &self.received
    }

    /// Notifications received so far, one JSON message per line.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for notification in &self.received {
            out.push_str(&notification_to_json(notification));
            out.push('\n');
        }
        out
    }

    /// Take and clear the recorded notifications.
    pub fn drain(&mut self) -> Vec<OverlayNotification> {
        core::mem::take(&mut self.received)
    }
}

impl NotificationSink for RecordingSink {
    fn trigger(&mut self, notification: OverlayNotification) {
        self.received.push(notification);
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

/// Error returned by [`RecordingPresenter`] when a failure is injected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureError(pub String);

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixture presenter: {}", self.0)
    }
}

impl std::error::Error for FixtureError {}

/// One presenter call, in the order received.
#[derive(Debug, Clone, PartialEq)]
pub enum PresenterOp {
    Create { surface: SurfaceId, z_index: i32 },
    Style { surface: SurfaceId, css: String },
    Visible { surface: SurfaceId, visible: bool },
    IndicatorText(String),
    InsertIndicator,
    RemoveIndicator,
}

#[derive(Debug, Clone, Default)]
struct PresentedSurface {
    z_index: i32,
    base_css: String,
    style: Option<SurfaceStyle>,
    visible: bool,
}

/// Presenter that records calls and mirrors the resulting surface state.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    surfaces: AHashMap<SurfaceId, PresentedSurface>,
    indicator_text: String,
    indicator_inserted: bool,
    ops: Vec<PresenterOp>,
    fail_styles: bool,
    fail_indicator: bool,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `apply_style` fail (or stop failing).
    pub fn fail_styles(&mut self, fail: bool) {
        self.fail_styles = fail;
    }

    /// Make every subsequent indicator operation fail (or stop failing).
    pub fn fail_indicator(&mut self, fail: bool) {
        self.fail_indicator = fail;
    }

    fn check_indicator(&self, op: &str) -> Result<(), FixtureError> {
        if self.fail_indicator {
            return Err(FixtureError(format!("cannot {op} indicator")));
        }
        Ok(())
    }

    #[must_use]
    pub fn ops(&self) -> &[PresenterOp] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn z_index(&self, surface: SurfaceId) -> Option<i32> {
        self.surfaces.get(&surface).map(|s| s.z_index)
    }

    /// Static declarations recorded when `surface` was created.
    #[must_use]
    pub fn base_css(&self, surface: SurfaceId) -> Option<&str> {
        self.surfaces.get(&surface).map(|s| s.base_css.as_str())
    }

    /// Last style applied to `surface`.
    #[must_use]
    pub fn style(&self, surface: SurfaceId) -> Option<&SurfaceStyle> {
        self.surfaces.get(&surface).and_then(|s| s.style.as_ref())
    }

    #[must_use]
    pub fn is_visible(&self, surface: SurfaceId) -> bool {
        self.surfaces.get(&surface).is_some_and(|s| s.visible)
    }

    /// Indicator text while the indicator is in the document.
    #[must_use]
    pub fn indicator(&self) -> Option<&str> {
        self.indicator_inserted.then_some(self.indicator_text.as_str())
    }

    fn surface_mut(&mut self, surface: SurfaceId) -> Result<&mut PresentedSurface, FixtureError> {
        self.surfaces
            .get_mut(&surface)
            .ok_or_else(|| FixtureError(format!("{} surface was never created", surface.name())))
    }
}

impl OverlayPresenter for RecordingPresenter {
    type Error = FixtureError;

    fn create_surface(&mut self, surface: SurfaceId, z_index: i32) -> Result<(), FixtureError> {
        self.ops.push(PresenterOp::Create { surface, z_index });
        self.surfaces.insert(
            surface,
            PresentedSurface {
                z_index,
                base_css: surface.base_css(z_index),
                style: None,
                visible: true,
            },
        );
        Ok(())
    }

    fn apply_style(&mut self, surface: SurfaceId, style: &SurfaceStyle) -> Result<(), FixtureError> {
        if self.fail_styles {
            return Err(FixtureError(format!("cannot style {}", surface.name())));
        }
        self.ops.push(PresenterOp::Style {
            surface,
            css: style.to_css(),
        });
        self.surface_mut(surface)?.style = Some(*style);
        Ok(())
    }

    fn set_visible(&mut self, surface: SurfaceId, visible: bool) -> Result<(), FixtureError> {
        self.ops.push(PresenterOp::Visible { surface, visible });
        self.surface_mut(surface)?.visible = visible;
        Ok(())
    }

    fn set_indicator_text(&mut self, text: &str) -> Result<(), FixtureError> {
        self.check_indicator("label")?;
        self.ops.push(PresenterOp::IndicatorText(text.to_string()));
        self.indicator_text.clear();
        self.indicator_text.push_str(text);
        Ok(())
    }

    fn insert_indicator(&mut self) -> Result<(), FixtureError> {
        self.check_indicator("insert")?;
        self.ops.push(PresenterOp::InsertIndicator);
        self.indicator_inserted = true;
        Ok(())
    }

    fn remove_indicator(&mut self) -> Result<(), FixtureError> {
        self.check_indicator("remove")?;
        self.ops.push(PresenterOp::RemoveIndicator);
        self.indicator_inserted = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Every fixture collaborator bundled as an [`InspectBackend`].
#[derive(Debug, Default)]
pub struct FixtureBackend {
    clock: DeterministicClock,
    document: FixtureDocument,
    registry: FixtureRegistry,
    sink: RecordingSink,
    presenter: RecordingPresenter,
}

impl FixtureBackend {
    #[must_use]
    pub fn new(document: FixtureDocument) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    #[must_use]
    pub fn document(&self) -> &FixtureDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut FixtureDocument {
        &mut self.document
    }

    #[must_use]
    pub fn node_registry(&self) -> &FixtureRegistry {
        &self.registry
    }

    #[must_use]
    pub fn notifications(&self) -> &RecordingSink {
        &self.sink
    }

    #[must_use]
    pub fn recorder(&self) -> &RecordingPresenter {
        &self.presenter
    }

    pub fn recorder_mut(&mut self) -> &mut RecordingPresenter {
        &mut self.presenter
    }
}

impl InspectBackend for FixtureBackend {
    type Node = FixtureNode;
    type Clock = DeterministicClock;
    type Provider = FixtureDocument;
    type Registry = FixtureRegistry;
    type Sink = RecordingSink;
    type Presenter = RecordingPresenter;

    fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    fn provider(&self) -> &FixtureDocument {
        &self.document
    }

    fn registry(&mut self) -> &mut FixtureRegistry {
        &mut self.registry
    }

    fn sink(&mut self) -> &mut RecordingSink {
        &mut self.sink
    }

    fn presenter(&mut self) -> &mut RecordingPresenter {
        &mut self.presenter
    }
}
