#![forbid(unsafe_code)]

//! Canonical pointer and resize events.
//!
//! Hosts translate DOM `MouseEvent`/`TouchEvent` values into [`PointerEvent`]
//! and window resizes into [`ResizeEvent`]. All coordinates are client
//! (viewport) coordinates in CSS pixels.
//!
//! # Design Notes
//!
//! - Touch events carry both `touches` and `changedTouches`; `touchend` has an
//!   empty `touches` list, so [`TouchList::primary`] falls back to the first
//!   changed touch.
//! - Pointer capabilities use bitflags so hybrid devices can enable both
//!   listener sets.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;

bitflags! {
    /// Input families the overlay listens to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PointerCapabilities: u8 {
        /// Mouse move/out/click.
        const MOUSE = 0b01;
        /// Touch start/move/end.
        const TOUCH = 0b10;
    }
}

impl Default for PointerCapabilities {
    fn default() -> Self {
        Self::MOUSE
    }
}

/// One touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    /// `Touch.identifier`.
    pub identifier: i64,
    /// Client coordinates.
    pub client: Point,
}

impl TouchPoint {
    /// Create a touch point.
    pub const fn new(identifier: i64, x: f64, y: f64) -> Self {
        Self {
            identifier,
            client: Point::new(x, y),
        }
    }
}

/// Touch lists carried by a touch event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchList {
    /// Touches currently on the surface.
    pub touches: Vec<TouchPoint>,
    /// Touches that changed in this event.
    pub changed_touches: Vec<TouchPoint>,
}

impl TouchList {
    /// Single active touch, also reported as changed.
    pub fn single(point: TouchPoint) -> Self {
        Self {
            touches: vec![point],
            changed_touches: vec![point],
        }
    }

    /// Touch that just lifted (`touchend` shape).
    pub fn lifted(point: TouchPoint) -> Self {
        Self {
            touches: Vec::new(),
            changed_touches: vec![point],
        }
    }

    /// First active touch, falling back to the first changed touch.
    pub fn primary(&self) -> Option<Point> {
        self.touches
            .first()
            .or_else(|| self.changed_touches.first())
            .map(|touch| touch.client)
    }
}

/// Pipeline phase a pointer event maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Retarget the hover highlight.
    Move,
    /// Pointer left the document; hide.
    Out,
    /// Commit the selection.
    Commit,
}

/// Canonical pointer event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// `mousemove`.
    MouseMove { client: Point },
    /// `mouseout`.
    MouseOut,
    /// `click`.
    Click { client: Point },
    /// `touchstart`.
    TouchStart(TouchList),
    /// `touchmove`.
    TouchMove(TouchList),
    /// `touchend`.
    TouchEnd(TouchList),
}

impl PointerEvent {
    /// Mouse move at client `(x, y)`.
    pub const fn mouse_move(x: f64, y: f64) -> Self {
        Self::MouseMove {
            client: Point::new(x, y),
        }
    }

    /// Click at client `(x, y)`.
    pub const fn click(x: f64, y: f64) -> Self {
        Self::Click {
            client: Point::new(x, y),
        }
    }

    /// DOM event type name.
    pub const fn dom_type(&self) -> &'static str {
        match self {
            Self::MouseMove { .. } => "mousemove",
            Self::MouseOut => "mouseout",
            Self::Click { .. } => "click",
            Self::TouchStart(_) => "touchstart",
            Self::TouchMove(_) => "touchmove",
            Self::TouchEnd(_) => "touchend",
        }
    }

    /// Pipeline phase for this event.
    pub const fn phase(&self) -> PointerPhase {
        match self {
            Self::MouseMove { .. } | Self::TouchStart(_) | Self::TouchMove(_) => PointerPhase::Move,
            Self::MouseOut => PointerPhase::Out,
            Self::Click { .. } | Self::TouchEnd(_) => PointerPhase::Commit,
        }
    }

    /// Input family that produced the event.
    pub const fn capability(&self) -> PointerCapabilities {
        match self {
            Self::MouseMove { .. } | Self::MouseOut | Self::Click { .. } => {
                PointerCapabilities::MOUSE
            }
            Self::TouchStart(_) | Self::TouchMove(_) | Self::TouchEnd(_) => {
                PointerCapabilities::TOUCH
            }
        }
    }

    /// Client position the event refers to, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { client } | Self::Click { client } => Some(*client),
            Self::MouseOut => None,
            Self::TouchStart(list) | Self::TouchMove(list) | Self::TouchEnd(list) => {
                list.primary()
            }
        }
    }
}

/// Window resize with the new inner viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    /// `window.innerWidth`.
    pub width: u32,
    /// `window.innerHeight`.
    pub height: u32,
}

impl ResizeEvent {
    /// Create a resize event.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Viewport size label shown by the indicator.
    pub fn label(&self) -> String {
        format!("{}px × {}px", self.width, self.height)
    }
}
