#![forbid(unsafe_code)]

//! boxscope public facade crate.
//!
//! Re-exports the types a host needs to embed the element inspector and
//! offers a message-level entry point: feed inbound `Overlay.*` JSON to
//! [`handle_message`], pointer events to
//! [`InspectController::dispatch_pointer`], and resizes and ticks to the
//! matching controller methods.

pub mod error;

pub use error::{DegradationAction, Error, Result};

// --- Core re-exports -------------------------------------------------------

pub use boxscope_core::{
    Color, ColorSpec, ComputedStyle, Edges, NodeId, NodeKind, Point, PointerCapabilities,
    PointerEvent, PointerPhase, Rect, ResizeEvent, SurfaceId, SurfaceStyle, TouchList, TouchPoint,
};

// --- Backend re-exports ----------------------------------------------------

pub use boxscope_backend::{
    InspectBackend, NodeRegistry, NodeSurface, NotificationSink, OverlayClock,
    OverlayNotification, OverlayPresenter, SurfaceProvider,
};

// --- Engine re-exports -----------------------------------------------------

pub use boxscope_web::{
    CommandOutcome, DeterministicClock, HighlightConfig, HighlightOutcome, IndicatorUpdate,
    InspectController, InspectMode, InspectSettings, ListenerRegistration, ListenerTarget,
    OverlayCommand, OverlayConfig, PointerDispatch, PointerOutcome, SystemClock,
    notification_to_json, parse_command,
};

/// Validate `config`, install the overlay surfaces, and return a controller.
pub fn install<B: InspectBackend>(backend: B, config: OverlayConfig) -> Result<InspectController<B>> {
    Ok(InspectController::new(backend, config)?)
}

/// Parse one inbound protocol message and execute it.
///
/// Returns `Ok(None)` for methods outside the `Overlay` commands this crate
/// handles. Parse failures map to [`DegradationAction::DropMessage`].
pub fn handle_message<B: InspectBackend>(
    controller: &mut InspectController<B>,
    json: &str,
) -> Result<Option<CommandOutcome>> {
    let Some(command) = parse_command(json)? else {
        return Ok(None);
    };
    Ok(Some(controller.execute(command)))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        CommandOutcome, Error, HighlightConfig, InspectBackend, InspectController, InspectMode,
        InspectSettings, OverlayConfig, PointerEvent, Rect, ResizeEvent, Result, handle_message,
        install,
    };

    pub use crate::{backend, core, web};
}

pub use boxscope_backend as backend;
pub use boxscope_core as core;
pub use boxscope_web as web;
