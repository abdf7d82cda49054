#![forbid(unsafe_code)]

//! Inspection mode and highlight configuration.
//!
//! The mode gates every pointer-driven behavior. Mode and highlight config are
//! replaced together by [`InspectState::apply`], so the pointer pipeline never
//! observes a new mode paired with a stale palette.

use boxscope_core::{Color, ColorSpec};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// InspectMode
// ---------------------------------------------------------------------------

/// Inspection mode as named on the wire.
///
/// Every mode other than [`InspectMode::None`] is active. Unrecognized names
/// are preserved verbatim in [`InspectMode::Other`] and are active too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InspectMode {
    #[default]
    None,
    SearchForNode,
    SearchForUaShadowDom,
    CaptureAreaScreenshot,
    ShowDistances,
    Other(String),
}

impl InspectMode {
    /// Parse a wire name.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "none" => Self::None,
            "searchForNode" => Self::SearchForNode,
            "searchForUAShadowDOM" => Self::SearchForUaShadowDom,
            "captureAreaScreenshot" => Self::CaptureAreaScreenshot,
            "showDistances" => Self::ShowDistances,
            other => Self::Other(other.to_string()),
        }
    }

    /// Wire name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::None => "none",
            Self::SearchForNode => "searchForNode",
            Self::SearchForUaShadowDom => "searchForUAShadowDOM",
            Self::CaptureAreaScreenshot => "captureAreaScreenshot",
            Self::ShowDistances => "showDistances",
            Self::Other(name) => name,
        }
    }

    /// Whether pointer events drive the overlay in this mode.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<String> for InspectMode {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<InspectMode> for String {
    fn from(mode: InspectMode) -> Self {
        match mode {
            InspectMode::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for InspectMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HighlightConfig
// ---------------------------------------------------------------------------

/// Host-supplied highlight colors. Absent colors are transparent.
///
/// Other highlight options a host may send (`showInfo`, `showRulers`, ...)
/// are accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlightConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_color: Option<ColorSpec>,
}

impl HighlightConfig {
    /// Resolve every color.
    #[must_use]
    pub fn palette(&self) -> HighlightPalette {
        let resolve = |spec: Option<ColorSpec>| spec.unwrap_or(ColorSpec::TRANSPARENT).resolve();
        HighlightPalette {
            margin: resolve(self.margin_color),
            border: resolve(self.border_color),
            padding: resolve(self.padding_color),
            content: resolve(self.content_color),
        }
    }
}

/// Resolved colors, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HighlightPalette {
    pub margin: Color,
    pub border: Color,
    pub padding: Color,
    pub content: Color,
}

// ---------------------------------------------------------------------------
// InspectState
// ---------------------------------------------------------------------------

/// Parameters of `setInspectMode`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectSettings {
    pub mode: InspectMode,
    #[serde(default)]
    pub highlight_config: HighlightConfig,
}

impl InspectSettings {
    #[must_use]
    pub fn new(mode: InspectMode, highlight_config: HighlightConfig) -> Self {
        Self {
            mode,
            highlight_config,
        }
    }
}

/// Mode transition performed by [`InspectState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeTransition {
    pub from: InspectMode,
    pub to: InspectMode,
}

impl ModeTransition {
    /// Whether inspection just stopped.
    #[must_use]
    pub fn deactivated(&self) -> bool {
        self.from.is_active() && !self.to.is_active()
    }

    #[must_use]
    pub fn activated(&self) -> bool {
        !self.from.is_active() && self.to.is_active()
    }
}

/// Current inspection mode and the palette that goes with it.
#[derive(Debug, Clone, Default)]
pub struct InspectState {
    settings: InspectSettings,
    palette: HighlightPalette,
}

impl InspectState {
    /// Inactive state with a transparent palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace mode and config in one step.
    pub fn apply(&mut self, settings: InspectSettings) -> ModeTransition {
        let palette = settings.highlight_config.palette();
        let previous = core::mem::replace(&mut self.settings, settings);
        self.palette = palette;
        ModeTransition {
            from: previous.mode,
            to: self.settings.mode.clone(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> &InspectMode {
        &self.settings.mode
    }

    #[must_use]
    pub fn highlight_config(&self) -> &HighlightConfig {
        &self.settings.highlight_config
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.settings.mode.is_active()
    }

    /// Palette to paint with, only while a mode is active.
    #[must_use]
    pub fn active_palette(&self) -> Option<HighlightPalette> {
        self.is_active().then_some(self.palette)
    }
}
