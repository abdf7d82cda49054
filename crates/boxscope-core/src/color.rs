#![forbid(unsafe_code)]

//! RGBA colors as supplied by the host and as handed to the renderer.
//!
//! A [`ColorSpec`] is the wire shape (`{r, g, b, a?}`); [`ColorSpec::resolve`]
//! turns it into a [`Color`] with a definite alpha. An absent or falsy alpha
//! resolves to `0`, not to opaque: a highlight config that names a color
//! without an alpha paints nothing. Channels arrive as arbitrary JSON numbers
//! and are normalized on resolve, so a malformed color never rejects the
//! message that carries it.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Host-supplied color with an optional alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSpec {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl ColorSpec {
    /// Fully transparent black, the default for every highlight color.
    pub const TRANSPARENT: ColorSpec = ColorSpec {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: Some(0.0),
    };

    /// Color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: Some(a),
        }
    }

    /// Color without an alpha channel.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: None,
        }
    }

    /// Normalize into a renderable color.
    ///
    /// Absent, zero, NaN, and non-finite alphas all resolve to `0`. Channels
    /// are rounded and clamped to `0..=255`; non-finite channels become `0`.
    #[must_use]
    pub fn resolve(&self) -> Color {
        let a = self.a.filter(|a| a.is_finite() && *a != 0.0).unwrap_or(0.0);
        Color {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a,
        }
    }
}

fn channel(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    // In range after the clamp, so the cast cannot truncate.
    value.round().clamp(0.0, 255.0) as u8
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        Self::rgba(color.r, color.g, color.b, color.a)
    }
}

/// A resolved four-channel color.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    /// Whether painting this color has no visible effect.
    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.a == 0.0
    }

    /// CSS functional notation, e.g. `rgba(255,0,0,0.5)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
