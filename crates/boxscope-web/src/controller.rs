#![forbid(unsafe_code)]

//! Inspection controller.
//!
//! [`InspectController`] owns the inspection state, the renderer, and a
//! backend. The host feeds it protocol commands, pointer events, resizes, and
//! clock ticks; it answers with outcomes and talks to the host's sink and
//! presenter through the backend.
//!
//! Nothing here returns an error to the host once the controller exists.
//! Presenter failures are logged and the overlay degrades to hidden;
//! unsupported nodes and empty space are no-ops.

use boxscope_backend::{
    InspectBackend, NodeRegistry, NotificationSink, OverlayClock, OverlayNotification,
    SurfaceProvider,
};
use boxscope_core::{NodeId, PointerEvent, PointerPhase, ResizeEvent};
use tracing::{debug, info_span, trace, warn};

use crate::OverlayError;
use crate::box_model::{HighlightGeometry, resolve_geometry};
use crate::config::OverlayConfig;
use crate::inspect_mode::{HighlightConfig, HighlightPalette, InspectSettings, InspectState};
use crate::pointer::{
    EventDisposition, ListenerRegistration, PointerDispatch, PointerIgnoredReason, PointerLogEntry,
    PointerOutcome, listener_plan,
};
use crate::protocol::OverlayCommand;
use crate::renderer::{IndicatorUpdate, OverlayLayout, OverlayRenderer};

/// Result of painting one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightOutcome {
    /// The overlay now shows this geometry.
    Painted(HighlightGeometry),
    /// The node has no box (comment, document, detached); nothing changed.
    NotHighlightable,
    /// The identity does not resolve to a live node; nothing changed.
    UnknownNode,
    /// The presenter failed; the overlay was hidden if possible.
    Degraded,
}

/// Result of executing one protocol command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandOutcome {
    /// State updated; nothing drawn.
    Applied,
    Highlight(HighlightOutcome),
    /// The overlay was hidden (or hiding failed and was logged).
    Hidden,
}

/// Host-driven element inspector.
pub struct InspectController<B: InspectBackend> {
    backend: B,
    config: OverlayConfig,
    state: InspectState,
    show_viewport_size_on_resize: bool,
    renderer: OverlayRenderer,
    next_sequence: u64,
}

impl<B: InspectBackend> core::fmt::Debug for InspectController<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InspectController")
            .field("mode", self.state.mode())
            .field("show_viewport_size_on_resize", &self.show_viewport_size_on_resize)
            .field("visible", &self.renderer.is_visible())
            .field("next_sequence", &self.next_sequence)
            .finish()
    }
}

impl<B: InspectBackend> InspectController<B> {
    /// Validate `config` and install the overlay surfaces.
    pub fn new(mut backend: B, config: OverlayConfig) -> Result<Self, OverlayError> {
        config.validate()?;
        let mut renderer = OverlayRenderer::new(&config);
        renderer
            .install(backend.presenter())
            .map_err(|err| OverlayError::Presenter(err.to_string()))?;
        debug!(
            pointer = ?config.pointer,
            indicator_idle_ms = config.indicator_idle_ms,
            "overlay installed"
        );
        Ok(Self {
            show_viewport_size_on_resize: config.show_viewport_size_on_resize,
            backend,
            config,
            state: InspectState::new(),
            renderer,
            next_sequence: 1,
        })
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Consume the controller and return its backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &InspectState {
        &self.state
    }

    #[must_use]
    pub fn renderer(&self) -> &OverlayRenderer {
        &self.renderer
    }

    #[must_use]
    pub const fn show_viewport_size_on_resize(&self) -> bool {
        self.show_viewport_size_on_resize
    }

    /// DOM listeners the host must register for this configuration.
    #[must_use]
    pub fn listeners(&self) -> Vec<ListenerRegistration> {
        listener_plan(self.config.pointer)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Execute one parsed protocol command.
    pub fn execute(&mut self, command: OverlayCommand) -> CommandOutcome {
        trace!(method = command.method(), "overlay command");
        match command {
            OverlayCommand::SetInspectMode(settings) => {
                self.set_inspect_mode(settings);
                CommandOutcome::Applied
            }
            OverlayCommand::SetShowViewportSizeOnResize { show } => {
                self.set_show_viewport_size_on_resize(show);
                CommandOutcome::Applied
            }
            OverlayCommand::HighlightNode {
                node_id,
                highlight_config,
            } => CommandOutcome::Highlight(self.highlight_node(node_id, &highlight_config)),
            OverlayCommand::HideHighlight => {
                self.hide_highlight();
                CommandOutcome::Hidden
            }
        }
    }

    /// Replace the inspection mode and its highlight config together.
    ///
    /// The overlay is left as is; a host leaving inspection normally follows
    /// with `hideHighlight`.
    pub fn set_inspect_mode(&mut self, settings: InspectSettings) {
        let transition = self.state.apply(settings);
        debug!(
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            activated = transition.activated(),
            deactivated = transition.deactivated(),
            "inspect mode changed"
        );
    }

    pub fn set_show_viewport_size_on_resize(&mut self, show: bool) {
        self.show_viewport_size_on_resize = show;
    }

    /// Paint the node with identity `node_id` using `config`'s colors.
    pub fn highlight_node(&mut self, node_id: NodeId, config: &HighlightConfig) -> HighlightOutcome {
        let Some(node) = self.backend.registry().get_node(node_id) else {
            debug!(node_id = node_id.0, outcome = "unknown_node", "highlight skipped");
            return HighlightOutcome::UnknownNode;
        };
        let outcome = self.paint_node(&node, &config.palette());
        trace!(node_id = node_id.0, outcome = ?outcome, "highlight node");
        outcome
    }

    /// Hide the overlay. Surfaces are kept.
    pub fn hide_highlight(&mut self) {
        self.hide_logged();
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    /// Run one pointer event through the inspection pipeline.
    pub fn dispatch_pointer(&mut self, event: &PointerEvent) -> PointerDispatch {
        let event_type = event.dom_type();
        let span = info_span!("overlay.dispatch", event = event_type);
        let _guard = span.enter();

        let phase = event.phase();
        let position = event.position();

        if !self.config.pointer.intersects(event.capability()) {
            return self.finish(PointerDispatch::ignored(
                phase,
                event_type,
                PointerIgnoredReason::ListenerNotRegistered,
                position,
            ));
        }
        let Some(palette) = self.state.active_palette() else {
            return self.finish(PointerDispatch::ignored(
                phase,
                event_type,
                PointerIgnoredReason::InspectInactive,
                position,
            ));
        };

        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        let mut log = PointerLogEntry {
            phase,
            event_type,
            sequence: Some(sequence),
            position,
            node_id: None,
            outcome: PointerOutcome::Hidden,
        };

        if phase == PointerPhase::Out {
            log.outcome = self.hide_outcome(PointerOutcome::Hidden);
            return self.finish(PointerDispatch {
                notification: None,
                disposition: EventDisposition::PASS_THROUGH,
                log,
            });
        }

        let disposition = if phase == PointerPhase::Commit {
            EventDisposition::SUPPRESS
        } else {
            EventDisposition::PASS_THROUGH
        };

        let Some(point) = position else {
            // A commit always ends the transient highlight, even without a target.
            if phase == PointerPhase::Commit {
                log.outcome = self.hide_outcome(PointerOutcome::Hidden);
                return self.finish(PointerDispatch {
                    notification: None,
                    disposition,
                    log,
                });
            }
            return self.finish(PointerDispatch::ignored(
                phase,
                event_type,
                PointerIgnoredReason::NoPointerPosition,
                None,
            ));
        };

        let Some(node) = self.backend.provider().element_from_point(point) else {
            log.outcome = self.hide_outcome(PointerOutcome::NothingUnderPointer);
            return self.finish(PointerDispatch {
                notification: None,
                disposition,
                log,
            });
        };

        let node_id = self.backend.registry().get_or_create_node_id(&node);
        log.node_id = Some(node_id);

        let notification = if phase == PointerPhase::Commit {
            let notification = OverlayNotification::InspectNodeRequested {
                backend_node_id: node_id,
            };
            self.backend.sink().trigger(notification);
            log.outcome = self.hide_outcome(PointerOutcome::Inspected);
            notification
        } else {
            log.outcome = match self.paint_node(&node, &palette) {
                HighlightOutcome::Painted(_) => PointerOutcome::Highlighted,
                HighlightOutcome::NotHighlightable | HighlightOutcome::UnknownNode => {
                    PointerOutcome::NotHighlightable
                }
                HighlightOutcome::Degraded => PointerOutcome::Degraded,
            };
            let notification = OverlayNotification::NodeHighlightRequested { node_id };
            self.backend.sink().trigger(notification);
            notification
        };

        self.finish(PointerDispatch {
            notification: Some(notification),
            disposition,
            log,
        })
    }

    /// Handle a window resize. Independent of the inspection mode.
    pub fn dispatch_resize(&mut self, event: ResizeEvent) -> IndicatorUpdate {
        if !self.show_viewport_size_on_resize {
            return IndicatorUpdate::Disabled;
        }
        let now = self.backend.clock().now_mono();
        let label = event.label();
        match self
            .renderer
            .show_viewport_indicator(self.backend.presenter(), now, &label)
        {
            Ok(update) => {
                trace!(width = event.width, height = event.height, update = ?update, "viewport indicator");
                update
            }
            Err(err) => {
                warn!(error = %err, "viewport indicator update failed");
                IndicatorUpdate::Failed
            }
        }
    }

    /// Advance timers. Returns whether the viewport indicator was removed.
    pub fn tick(&mut self) -> bool {
        let now = self.backend.clock().now_mono();
        match self.renderer.tick(self.backend.presenter(), now) {
            Ok(removed) => {
                if removed {
                    trace!(now_ms = now.as_millis() as u64, "viewport indicator removed");
                }
                removed
            }
            Err(err) => {
                warn!(error = %err, "viewport indicator removal failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn paint_node(&mut self, node: &B::Node, palette: &HighlightPalette) -> HighlightOutcome {
        let provider = self.backend.provider();
        let Some(geometry) = resolve_geometry(provider, node) else {
            return HighlightOutcome::NotHighlightable;
        };
        let layout = OverlayLayout::compute(&geometry, palette, provider.scroll_offset());
        match self.renderer.paint(self.backend.presenter(), layout) {
            Ok(()) => HighlightOutcome::Painted(geometry),
            Err(err) => {
                warn!(error = %err, geometry = geometry.kind(), "overlay paint failed, hiding");
                self.hide_logged();
                HighlightOutcome::Degraded
            }
        }
    }

    fn hide_logged(&mut self) -> bool {
        match self.renderer.hide(self.backend.presenter()) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "overlay hide failed");
                false
            }
        }
    }

    fn hide_outcome(&mut self, on_success: PointerOutcome) -> PointerOutcome {
        if self.hide_logged() {
            on_success
        } else {
            PointerOutcome::Degraded
        }
    }

    fn finish(&self, dispatch: PointerDispatch) -> PointerDispatch {
        let log = &dispatch.log;
        debug!(
            phase = ?log.phase,
            sequence = log.sequence,
            node_id = log.node_id.map(|id| id.0),
            outcome = log.outcome.label(),
            "pointer dispatch"
        );
        dispatch
    }
}
