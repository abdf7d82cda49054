#![forbid(unsafe_code)]

//! Overlay configuration.
//!
//! Every field has a default, so hosts may supply a partial JSON object (or
//! nothing at all) and still get the stock inspector behavior.

use core::time::Duration;

use boxscope_core::{PointerCapabilities, SurfaceId};
use serde::{Deserialize, Serialize};

use crate::OverlayError;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Stacking order of the four layered surfaces inside the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceZOrder {
    pub margin: i32,
    pub border: i32,
    pub padding: i32,
    pub content: i32,
}

impl Default for SurfaceZOrder {
    fn default() -> Self {
        Self {
            margin: SurfaceId::Margin.default_z_index(),
            border: SurfaceId::Border.default_z_index(),
            padding: SurfaceId::Padding.default_z_index(),
            content: SurfaceId::Content.default_z_index(),
        }
    }
}

impl SurfaceZOrder {
    /// Z-order for `surface`. The container itself sits at `0`.
    #[must_use]
    pub const fn get(&self, surface: SurfaceId) -> i32 {
        match surface {
            SurfaceId::Container => 0,
            SurfaceId::Margin => self.margin,
            SurfaceId::Border => self.border,
            SurfaceId::Padding => self.padding,
            SurfaceId::Content => self.content,
        }
    }

    fn is_strictly_layered(&self) -> bool {
        self.margin < self.border && self.border < self.padding && self.padding < self.content
    }
}

/// Overlay controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Idle time after the last resize before the viewport indicator is
    /// removed (default: 1000ms).
    pub indicator_idle_ms: u64,
    /// Input families to register listeners for (default: mouse).
    pub pointer: PointerCapabilities,
    /// Surface stacking order (default: 100/200/300/400).
    pub z_order: SurfaceZOrder,
    /// Initial value of the "show viewport size on resize" flag
    /// (default: false).
    pub show_viewport_size_on_resize: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            indicator_idle_ms: 1000,
            pointer: PointerCapabilities::MOUSE,
            z_order: SurfaceZOrder::default(),
            show_viewport_size_on_resize: false,
        }
    }
}

impl OverlayConfig {
    /// Stock configuration for touch-first devices.
    #[must_use]
    pub fn touch() -> Self {
        Self {
            pointer: PointerCapabilities::TOUCH,
            ..Self::default()
        }
    }

    /// Decode a (possibly partial) JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| OverlayError::ConfigDecode(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Indicator idle timeout as a [`Duration`].
    #[must_use]
    pub const fn indicator_idle(&self) -> Duration {
        Duration::from_millis(self.indicator_idle_ms)
    }

    /// Reject configurations the controller cannot honor.
    pub fn validate(&self) -> Result<(), OverlayError> {
        if self.indicator_idle_ms == 0 {
            return Err(OverlayError::InvalidConfig(
                "indicator idle must be non-zero",
            ));
        }
        if self.pointer.is_empty() {
            return Err(OverlayError::InvalidConfig(
                "at least one pointer family must be enabled",
            ));
        }
        if !self.z_order.is_strictly_layered() {
            return Err(OverlayError::InvalidConfig(
                "surface z-order must increase from margin to content",
            ));
        }
        Ok(())
    }
}
