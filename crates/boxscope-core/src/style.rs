#![forbid(unsafe_code)]

//! Computed style snapshot.
//!
//! A [`ComputedStyle`] is what a surface provider reads from
//! `getComputedStyle()`: property names to serialized values. Lookups of
//! absent properties return `""`, like `CSSStyleDeclaration.getPropertyValue`.

use ahash::AHashMap;

use crate::geometry::Edges;

/// `margin-*` longhands, clockwise from the top.
pub const MARGIN_PROPERTIES: [&str; 4] = ["margin-top", "margin-right", "margin-bottom", "margin-left"];

/// `border-*-width` longhands, clockwise from the top.
pub const BORDER_WIDTH_PROPERTIES: [&str; 4] = [
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
];

/// `padding-*` longhands, clockwise from the top.
pub const PADDING_PROPERTIES: [&str; 4] = [
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
];

/// Parse a pixel length such as `"12px"` or `"0.5px"`.
///
/// Keywords (`auto`), empty strings, and non-finite numbers read as `0`.
pub fn px_to_num(value: &str) -> f64 {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    match number.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => 0.0,
    }
}

/// Snapshot of computed style properties for one element.
#[derive(Debug, Clone, Default)]
pub struct ComputedStyle {
    properties: AHashMap<String, String>,
}

impl ComputedStyle {
    /// Empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// Style whose twelve box-edge longhands are set from the given edges.
    pub fn from_box_edges(margin: Edges, border: Edges, padding: Edges) -> Self {
        let mut style = Self::new();
        style.set_edges(&MARGIN_PROPERTIES, margin);
        style.set_edges(&BORDER_WIDTH_PROPERTIES, border);
        style.set_edges(&PADDING_PROPERTIES, padding);
        style
    }

    /// Set one property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Builder form of [`ComputedStyle::set_property`].
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Serialized value, or `""` when absent.
    pub fn get_property_value(&self, name: &str) -> &str {
        self.properties.get(name).map_or("", String::as_str)
    }

    /// Property read as a pixel length.
    pub fn px(&self, name: &str) -> f64 {
        px_to_num(self.get_property_value(name))
    }

    /// Four longhands (top, right, bottom, left) read as pixel lengths.
    pub fn edges(&self, names: &[&str; 4]) -> Edges {
        Edges::new(
            self.px(names[0]),
            self.px(names[1]),
            self.px(names[2]),
            self.px(names[3]),
        )
    }

    /// Number of properties in the snapshot.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    fn set_edges(&mut self, names: &[&str; 4], edges: Edges) {
        let values = [edges.top, edges.right, edges.bottom, edges.left];
        for (name, value) in names.iter().zip(values) {
            self.set_property(*name, format!("{value}px"));
        }
    }
}
