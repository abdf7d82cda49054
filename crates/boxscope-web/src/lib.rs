#![forbid(unsafe_code)]

//! `boxscope-web` is the host-driven element inspector overlay.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes pointer events,
//!   resizes, protocol commands, and clock ticks.
//! - **Deterministic time**: the only timer (the viewport-size indicator
//!   debounce) is a deadline checked against an injected clock.
//! - **No blocking / no threads**: every call returns after doing its work;
//!   suitable for `wasm32-unknown-unknown`.
//!
//! This crate does not bind to `wasm-bindgen`. Document queries, node
//! identities, notifications, and drawing all flow through the
//! `boxscope-backend` traits, so the same controller runs against a live page
//! or against the synthetic [`fixture`] backend.

pub mod box_model;
pub mod config;
pub mod controller;
pub mod deferred;
pub mod fixture;
pub mod inspect_mode;
pub mod pointer;
pub mod protocol;
pub mod renderer;

use core::time::Duration;

use boxscope_backend::OverlayClock;

pub use box_model::{BoxModel, HighlightGeometry, resolve_geometry};
pub use config::{OverlayConfig, SurfaceZOrder};
pub use controller::{CommandOutcome, HighlightOutcome, InspectController};
pub use deferred::DeferredAction;
pub use inspect_mode::{HighlightConfig, HighlightPalette, InspectMode, InspectSettings, InspectState};
pub use pointer::{
    EventDisposition, ListenerRegistration, ListenerTarget, PointerDispatch, PointerIgnoredReason,
    PointerLogEntry, PointerOutcome, listener_plan,
};
pub use protocol::{CommandParseError, OverlayCommand, notification_to_json, parse_command};
pub use renderer::{IndicatorUpdate, OverlayLayout, OverlayRenderer};

/// Overlay engine error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A presenter operation failed; carries the presenter's message.
    Presenter(String),
    /// Configuration rejected by validation.
    InvalidConfig(&'static str),
    /// Configuration could not be decoded.
    ConfigDecode(String),
}

impl core::fmt::Display for OverlayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Presenter(msg) => write!(f, "presenter failed: {msg}"),
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::ConfigDecode(msg) => write!(f, "config decode error: {msg}"),
        }
    }
}

impl std::error::Error for OverlayError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl OverlayClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Wall clock backed by `performance.now()` on the web and `Instant` natively.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    /// Clock whose epoch is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayClock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}
