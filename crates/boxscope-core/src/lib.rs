#![forbid(unsafe_code)]

//! Core: geometry, colors, node identity, and canonical pointer events.
//!
//! # Role in boxscope
//! `boxscope-core` is the vocabulary layer. It owns the plain value types that
//! every other crate exchanges: rectangles and edge measurements in CSS
//! pixels, RGBA colors, node identities, pointer/resize events, and the
//! per-surface styles the overlay renderer hands to a presenter.
//!
//! # How it fits in the system
//! `boxscope-backend` defines the collaborator traits in terms of these types,
//! and `boxscope-web` drives the inspection pipeline over them. Nothing in this
//! crate touches a live document.

pub mod color;
pub mod event;
pub mod geometry;
pub mod node;
pub mod style;
pub mod surface;

pub use color::{Color, ColorSpec};
pub use event::{PointerCapabilities, PointerEvent, PointerPhase, ResizeEvent, TouchList, TouchPoint};
pub use geometry::{Edges, Point, Rect};
pub use node::{NodeId, NodeKind};
pub use style::ComputedStyle;
pub use surface::{Frame, SurfaceId, SurfaceStyle};
