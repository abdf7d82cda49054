#![forbid(unsafe_code)]

//! Box-model geometry resolution.
//!
//! Turns a node into the four nested rectangles of the CSS box model. Reads
//! through [`SurfaceProvider`] only; the document is never mutated.
//!
//! Nothing here clamps. An element whose borders and paddings exceed its
//! border box yields negative padding/content extents, and those reach the
//! renderer unchanged.

use boxscope_backend::{NodeSurface, SurfaceProvider};
use boxscope_core::style::{BORDER_WIDTH_PROPERTIES, MARGIN_PROPERTIES, PADDING_PROPERTIES};
use boxscope_core::{ComputedStyle, Edges, Rect};

/// Box-model decomposition of an element.
///
/// All rectangles are in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxModel {
    /// `getBoundingClientRect` of the element.
    pub border_box: Rect,
    pub margin: Edges,
    pub border: Edges,
    pub padding: Edges,
}

impl BoxModel {
    /// Read the twelve edge measurements from `style`.
    #[must_use]
    pub fn from_style(border_box: Rect, style: &ComputedStyle) -> Self {
        Self {
            border_box,
            margin: style.edges(&MARGIN_PROPERTIES),
            border: style.edges(&BORDER_WIDTH_PROPERTIES),
            padding: style.edges(&PADDING_PROPERTIES),
        }
    }

    /// Border box extended outward by the margins.
    #[must_use]
    pub fn margin_rect(&self) -> Rect {
        self.border_box.outset(self.margin)
    }

    #[must_use]
    pub fn border_rect(&self) -> Rect {
        self.border_box
    }

    /// Border box minus border widths, offset by `(border.left, border.top)`.
    #[must_use]
    pub fn padding_rect(&self) -> Rect {
        self.border_box.inset(self.border)
    }

    /// Padding box minus padding widths, offset by `(padding.left, padding.top)`.
    #[must_use]
    pub fn content_rect(&self) -> Rect {
        self.padding_rect().inset(self.padding)
    }
}

/// Result of resolving a highlightable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightGeometry {
    /// Element with a full box model.
    Element(BoxModel),
    /// Text node: the range rectangle is the content box; margin, border and
    /// padding are all zero.
    Text(Rect),
}

impl HighlightGeometry {
    /// Rectangle the overlay container is anchored to.
    #[must_use]
    pub fn anchor(&self) -> Rect {
        match self {
            Self::Element(model) => model.border_box,
            Self::Text(rect) => *rect,
        }
    }

    #[must_use]
    pub fn content_rect(&self) -> Rect {
        match self {
            Self::Element(model) => model.content_rect(),
            Self::Text(rect) => *rect,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Element(_) => "element",
            Self::Text(_) => "text",
        }
    }
}

/// Resolve `node` into highlight geometry.
///
/// Returns `None` for nodes that cannot be highlighted (comments, documents,
/// detached nodes). That is a no-op for the caller, not an error.
pub fn resolve_geometry<P: SurfaceProvider>(provider: &P, node: &P::Node) -> Option<HighlightGeometry> {
    match provider.surface(node) {
        NodeSurface::Element { border_box, style } => {
            Some(HighlightGeometry::Element(BoxModel::from_style(border_box, &style)))
        }
        NodeSurface::TextRange(rect) => Some(HighlightGeometry::Text(rect)),
        NodeSurface::None => None,
    }
}
