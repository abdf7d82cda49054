#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Unlike layout code, nothing here clamps. Box-model arithmetic on author
//! supplied borders and paddings may legitimately produce zero or negative
//! extents, and those values must reach the renderer unchanged.

use serde::{Deserialize, Serialize};

/// A point in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle (`left, top, width, height`).
///
/// Origin is top-left; `width`/`height` may be negative when produced by
/// [`Rect::inset`] on an over-constrained box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f64,
    /// Top edge.
    pub top: f64,
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Check if the rectangle has no visible area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Move the rectangle by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// Shrink the rectangle by `edges`, offsetting the origin by the
    /// left/top edges. Never clamps.
    #[must_use]
    pub fn inset(&self, edges: Edges) -> Rect {
        Rect {
            left: self.left + edges.left,
            top: self.top + edges.top,
            width: self.width - edges.left - edges.right,
            height: self.height - edges.top - edges.bottom,
        }
    }

    /// Grow the rectangle outward by `edges`.
    #[must_use]
    pub fn outset(&self, edges: Edges) -> Rect {
        Rect {
            left: self.left - edges.left,
            top: self.top - edges.top,
            width: self.width + edges.left + edges.right,
            height: self.height + edges.top + edges.bottom,
        }
    }
}

/// Per-side measurements for margin, border width, and padding.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    /// All sides zero.
    pub const ZERO: Edges = Edges::all(0.0);

    /// Create new edges with equal values.
    pub const fn all(val: f64) -> Self {
        Self {
            top: val,
            right: val,
            bottom: val,
            left: val,
        }
    }

    /// Create new edges with specific values, clockwise from the top.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl From<f64> for Edges {
    fn from(val: f64) -> Self {
        Self::all(val)
    }
}

impl From<(f64, f64)> for Edges {
    fn from((vertical, horizontal): (f64, f64)) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }
}

impl From<(f64, f64, f64, f64)> for Edges {
    fn from((top, right, bottom, left): (f64, f64, f64, f64)) -> Self {
        Self::new(top, right, bottom, left)
    }
}

#[cfg(test)]
mod tests {
    use super::{Edges, Point, Rect};

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(2.0, 3.0, 4.0, 5.0);
        assert!(rect.contains(Point::new(2.0, 3.0)));
        assert!(rect.contains(Point::new(5.5, 7.9)));
        assert!(!rect.contains(Point::new(6.0, 3.0)));
        assert!(!rect.contains(Point::new(2.0, 8.0)));
    }

    #[test]
    fn inset_offsets_origin_and_shrinks() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        let inner = rect.inset(Edges::all(2.0));
        assert_eq!(inner, Rect::new(12.0, 12.0, 96.0, 46.0));
    }

    #[test]
    fn inset_does_not_clamp() {
        let rect = Rect::new(0.0, 0.0, 10.0, 4.0);
        let inner = rect.inset(Edges::new(3.0, 8.0, 3.0, 8.0));
        assert_eq!(inner.width, -6.0);
        assert_eq!(inner.height, -2.0);
        assert!(inner.is_empty());
    }

    #[test]
    fn outset_grows_each_side() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        let outer = rect.outset(Edges::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(outer, Rect::new(6.0, 9.0, 106.0, 54.0));
    }

    #[test]
    fn edges_from_tuples() {
        assert_eq!(Edges::from(2.0), Edges::all(2.0));
        assert_eq!(Edges::from((1.0, 2.0)), Edges::new(1.0, 2.0, 1.0, 2.0));
        assert_eq!(
            Edges::from((1.0, 2.0, 3.0, 4.0)),
            Edges::new(1.0, 2.0, 3.0, 4.0)
        );
    }
}
