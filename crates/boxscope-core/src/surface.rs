#![forbid(unsafe_code)]

//! Overlay surfaces and their styles.
//!
//! The overlay is one container holding four layered surfaces. The renderer
//! computes a [`SurfaceStyle`] per surface; presenters apply it to whatever
//! primitive they own (a positioned `<div>` on the web, a rectangle in a
//! headless recorder).

use core::fmt::Write as _;

use crate::color::Color;
use crate::geometry::{Edges, Rect};

/// One of the overlay's surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceId {
    /// Absolutely positioned container at the target's border box.
    Container,
    /// Margin band.
    Margin,
    /// Border band.
    Border,
    /// Padding band.
    Padding,
    /// Content fill.
    Content,
}

impl SurfaceId {
    /// Layered surfaces in paint order (lowest z-order first).
    pub const LAYERS: [SurfaceId; 4] = [Self::Margin, Self::Border, Self::Padding, Self::Content];

    /// Default stacking order inside the container.
    pub const fn default_z_index(self) -> i32 {
        match self {
            Self::Container => 0,
            Self::Margin => 100,
            Self::Border => 200,
            Self::Padding => 300,
            Self::Content => 400,
        }
    }

    /// Short lowercase name, used in logs and CSS class names.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Margin => "margin",
            Self::Border => "border",
            Self::Padding => "padding",
            Self::Content => "content",
        }
    }

    /// Static declarations a presenter applies once when creating the surface.
    pub fn base_css(self, z_index: i32) -> String {
        match self {
            Self::Container => "position:absolute;pointer-events:none".to_string(),
            _ => format!("position:absolute;box-sizing:border-box;z-index:{z_index}"),
        }
    }
}

/// A solid frame: each side is a band of `color`, `widths` thick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub widths: Edges,
    pub color: Color,
}

/// Dynamic style of one surface after a paint.
///
/// `rect` is relative to the container for layered surfaces and absolute
/// (document coordinates) for the container itself.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceStyle {
    pub rect: Rect,
    pub frame: Option<Frame>,
    pub fill: Option<Color>,
}

impl SurfaceStyle {
    /// Positioned surface with no paint.
    pub const fn positioned(rect: Rect) -> Self {
        Self {
            rect,
            frame: None,
            fill: None,
        }
    }

    /// Zero-sized surface with no paint.
    pub const fn collapsed() -> Self {
        Self::positioned(Rect::ZERO)
    }

    /// Add a frame.
    #[must_use]
    pub const fn with_frame(mut self, widths: Edges, color: Color) -> Self {
        self.frame = Some(Frame { widths, color });
        self
    }

    /// Add a background fill.
    #[must_use]
    pub const fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Inline CSS declarations for this style.
    ///
    /// Collapsed surfaces also reset their borders so a stale frame from a
    /// previous element paint cannot keep them visible.
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        let rect = self.rect;
        let _ = write!(
            css,
            "left:{}px;top:{}px;width:{}px;height:{}px",
            rect.left, rect.top, rect.width, rect.height
        );
        match self.frame {
            Some(frame) => {
                let sides = [
                    ("top", frame.widths.top),
                    ("right", frame.widths.right),
                    ("bottom", frame.widths.bottom),
                    ("left", frame.widths.left),
                ];
                for (side, width) in sides {
                    let _ = write!(css, ";border-{side}:{width}px solid {}", frame.color);
                }
            }
            None => css.push_str(";border:0"),
        }
        if let Some(fill) = self.fill {
            let _ = write!(css, ";background:{fill}");
        }
        css
    }
}
