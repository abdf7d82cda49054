#![forbid(unsafe_code)]

//! Overlay renderer.
//!
//! Owns the persistent surface set (one container, four layers) and the
//! transient viewport-size indicator. Layout is computed by
//! [`OverlayLayout::compute`] as a pure function; [`OverlayRenderer`] only
//! pushes the result through an [`OverlayPresenter`].
//!
//! # Surface layout
//!
//! The container sits at the target's border box (plus document scroll). For
//! a border box of size `W x H` the layers are placed relative to it:
//!
//! | surface | origin                   | size                              |
//! |---------|--------------------------|-----------------------------------|
//! | margin  | `(-ml, -mt)`             | `(W+ml+mr, H+mt+mb)`              |
//! | border  | `(0, 0)`                 | `(W, H)`                          |
//! | padding | `(bl, bt)`               | `(pw, ph) = (W-bl-br, H-bt-bb)`   |
//! | content | `(bl+pl, bt+pt)`         | `(pw-pl-pr, ph-pt-pb)`            |
//!
//! Margin, border, and padding are frames whose bands are as thick as the
//! matching edge measurement. Content is a plain fill.

use core::time::Duration;

use boxscope_backend::OverlayPresenter;
use boxscope_core::{Point, Rect, SurfaceId, SurfaceStyle};

use crate::box_model::HighlightGeometry;
use crate::config::{OverlayConfig, SurfaceZOrder};
use crate::deferred::DeferredAction;
use crate::inspect_mode::HighlightPalette;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Styles for every surface after one paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLayout {
    /// Absolute (document) position of the container.
    pub container: SurfaceStyle,
    pub margin: SurfaceStyle,
    pub border: SurfaceStyle,
    pub padding: SurfaceStyle,
    pub content: SurfaceStyle,
}

impl OverlayLayout {
    /// Lay out the surfaces for `geometry`.
    ///
    /// `scroll` is the document scroll offset; geometry is in viewport
    /// coordinates, the container is absolutely positioned in the document.
    #[must_use]
    pub fn compute(geometry: &HighlightGeometry, palette: &HighlightPalette, scroll: Point) -> Self {
        let anchor = geometry.anchor();
        let container = SurfaceStyle::positioned(anchor.translate(scroll.x, scroll.y));
        let local = Rect::from_size(anchor.width, anchor.height);

        match geometry {
            HighlightGeometry::Element(model) => {
                let padding_rect = local.inset(model.border);
                Self {
                    container,
                    margin: SurfaceStyle::positioned(local.outset(model.margin))
                        .with_frame(model.margin, palette.margin),
                    border: SurfaceStyle::positioned(local).with_frame(model.border, palette.border),
                    padding: SurfaceStyle::positioned(padding_rect)
                        .with_frame(model.padding, palette.padding),
                    content: SurfaceStyle::positioned(padding_rect.inset(model.padding))
                        .with_fill(palette.content),
                }
            }
            HighlightGeometry::Text(_) => Self {
                container,
                margin: SurfaceStyle::collapsed(),
                border: SurfaceStyle::collapsed(),
                padding: SurfaceStyle::collapsed(),
                content: SurfaceStyle::positioned(local).with_fill(palette.content),
            },
        }
    }

    /// Style for one surface.
    #[must_use]
    pub const fn style(&self, surface: SurfaceId) -> &SurfaceStyle {
        match surface {
            SurfaceId::Container => &self.container,
            SurfaceId::Margin => &self.margin,
            SurfaceId::Border => &self.border,
            SurfaceId::Padding => &self.padding,
            SurfaceId::Content => &self.content,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// What a resize did to the viewport indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorUpdate {
    /// The "show on resize" flag is off; nothing happened.
    Disabled,
    /// The indicator was absent and has been inserted.
    Inserted,
    /// The indicator was already showing; its text changed and its idle
    /// timer restarted.
    Refreshed,
    /// The presenter rejected the update.
    Failed,
}

#[derive(Debug, Clone)]
struct ViewportIndicator {
    text: String,
    inserted: bool,
    idle: DeferredAction,
}

/// Persistent overlay surfaces and the viewport indicator.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    z_order: SurfaceZOrder,
    installed: bool,
    visible: bool,
    layout: Option<OverlayLayout>,
    indicator: ViewportIndicator,
}

impl OverlayRenderer {
    /// Renderer with nothing installed yet.
    #[must_use]
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            z_order: config.z_order,
            installed: false,
            visible: false,
            layout: None,
            indicator: ViewportIndicator {
                text: String::new(),
                inserted: false,
                idle: DeferredAction::new(config.indicator_idle()),
            },
        }
    }

    /// Create the container and its four layers. Idempotent; surfaces are
    /// never destroyed afterwards. The container starts hidden.
    pub fn install<P: OverlayPresenter>(&mut self, presenter: &mut P) -> Result<(), P::Error> {
        if self.installed {
            return Ok(());
        }
        presenter.create_surface(SurfaceId::Container, self.z_order.get(SurfaceId::Container))?;
        for layer in SurfaceId::LAYERS {
            presenter.create_surface(layer, self.z_order.get(layer))?;
        }
        presenter.set_visible(SurfaceId::Container, false)?;
        self.installed = true;
        self.visible = false;
        Ok(())
    }

    /// Restyle every surface from `layout` and show the container.
    pub fn paint<P: OverlayPresenter>(
        &mut self,
        presenter: &mut P,
        layout: OverlayLayout,
    ) -> Result<(), P::Error> {
        self.install(presenter)?;
        presenter.apply_style(SurfaceId::Container, &layout.container)?;
        for layer in SurfaceId::LAYERS {
            presenter.apply_style(layer, layout.style(layer))?;
        }
        presenter.set_visible(SurfaceId::Container, true)?;
        self.layout = Some(layout);
        self.visible = true;
        Ok(())
    }

    /// Hide the container. Surfaces keep their last style.
    pub fn hide<P: OverlayPresenter>(&mut self, presenter: &mut P) -> Result<(), P::Error> {
        presenter.set_visible(SurfaceId::Container, false)?;
        self.visible = false;
        Ok(())
    }

    /// Show `text` in the viewport indicator and (re)start its idle timer.
    pub fn show_viewport_indicator<P: OverlayPresenter>(
        &mut self,
        presenter: &mut P,
        now: Duration,
        text: &str,
    ) -> Result<IndicatorUpdate, P::Error> {
        presenter.set_indicator_text(text)?;
        self.indicator.text.clear();
        self.indicator.text.push_str(text);

        let update = if self.indicator.inserted {
            IndicatorUpdate::Refreshed
        } else {
            presenter.insert_indicator()?;
            self.indicator.inserted = true;
            IndicatorUpdate::Inserted
        };
        self.indicator.idle.schedule(now);
        Ok(update)
    }

    /// Remove the indicator once its idle timer has expired.
    ///
    /// Returns whether the indicator was removed by this call. If the
    /// presenter fails, the indicator stays inserted and removal is retried
    /// after another idle period.
    pub fn tick<P: OverlayPresenter>(&mut self, presenter: &mut P, now: Duration) -> Result<bool, P::Error> {
        if !self.indicator.idle.fire_if_due(now) {
            return Ok(false);
        }
        if let Err(err) = presenter.remove_indicator() {
            self.indicator.idle.schedule(now);
            return Err(err);
        }
        self.indicator.inserted = false;
        Ok(true)
    }

    #[must_use]
    pub const fn is_installed(&self) -> bool {
        self.installed
    }

    /// Whether the container is currently shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    /// Layout of the most recent paint.
    #[must_use]
    pub const fn last_layout(&self) -> Option<&OverlayLayout> {
        self.layout.as_ref()
    }

    /// Indicator text while the indicator is in the document.
    #[must_use]
    pub fn indicator_text(&self) -> Option<&str> {
        self.indicator.inserted.then_some(self.indicator.text.as_str())
    }

    /// When the indicator will be removed, if a removal is pending.
    #[must_use]
    pub const fn indicator_deadline(&self) -> Option<Duration> {
        self.indicator.idle.deadline()
    }
}
