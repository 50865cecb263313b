//! Scene compositor.
//!
//! Paints the background, then every element in ascending z-index, onto a
//! surface of the scene's fixed pixel size. A layer whose source cannot be
//! loaded (or whose paint cannot be resolved) is left blank and reported; the
//! remaining layers still render.

use adforge_core::color::gradient_stops;
use adforge_core::{Background, BackgroundKind, Element, ElementId, ElementKind, Rgba, Scene};
use serde::Serialize;
use tiny_skia::{
    FillRule, FilterQuality, Pixmap, PixmapPaint, Point, Rect, Stroke, Transform,
};

use crate::cache::SourceCache;
use crate::config::RendererConfig;
use crate::error::{RenderError, RenderResult};
use crate::paint::{
    background_transform, element_transform, linear_paint, rounded_rect, solid_paint,
};
use crate::text::TextRenderer;

/// Paint layer identity in a [`LayerFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layer", content = "id", rename_all = "lowercase")]
pub enum Layer {
    /// The page background.
    Background,
    /// One element.
    Element(ElementId),
}

/// One layer that could not be drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerFailure {
    /// Which layer.
    pub layer: Layer,
    /// What went wrong.
    pub reason: String,
}

/// A finished composite and the layers it had to leave blank.
#[derive(Debug, Clone)]
pub struct RenderReport {
    /// The flattened surface.
    pub surface: Pixmap,
    /// Layers that failed, in paint order.
    pub failures: Vec<LayerFailure>,
}

impl RenderReport {
    /// Whether every layer drew.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders scenes to raster surfaces.
#[derive(Debug)]
pub struct Rasterizer {
    text: TextRenderer,
    cache: SourceCache,
}

impl Rasterizer {
    /// Create a rasterizer, loading fonts per `config`.
    #[must_use]
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            text: TextRenderer::new(config),
            cache: SourceCache::new(config.cache_capacity),
        }
    }

    /// The decoded source cache, for inserting pre-fetched images.
    pub fn cache_mut(&mut self) -> &mut SourceCache {
        &mut self.cache
    }

    /// The decoded source cache.
    #[must_use]
    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    /// Render a scene.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Surface`] only if the surface itself cannot be
    /// allocated. Per-layer problems are reported in the returned
    /// [`RenderReport`].
    pub fn render(&mut self, scene: &Scene) -> RenderResult<RenderReport> {
        let (width, height) = scene.aspect_ratio.dimensions();
        let mut surface = Pixmap::new(width, height)
            .ok_or_else(|| RenderError::Surface(format!("cannot allocate {width}x{height}")))?;
        let mut failures = Vec::new();

        if let Err(reason) = self.paint_background(&mut surface, &scene.background) {
            tracing::warn!(%reason, "background layer failed");
            failures.push(LayerFailure {
                layer: Layer::Background,
                reason,
            });
        }

        for element in scene.paint_order() {
            if let Err(reason) = self.paint_element(&mut surface, element) {
                tracing::warn!(id = %element.id, kind = element.kind.name(), %reason, "element layer failed");
                failures.push(LayerFailure {
                    layer: Layer::Element(element.id),
                    reason,
                });
            }
        }

        tracing::debug!(
            width,
            height,
            elements = scene.element_count(),
            failures = failures.len(),
            "scene rendered"
        );
        Ok(RenderReport { surface, failures })
    }

    fn paint_background(&mut self, surface: &mut Pixmap, bg: &Background) -> Result<(), String> {
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (surface.width() as f32, surface.height() as f32);
        match bg.kind {
            BackgroundKind::Color => {
                let color = Rgba::parse(&bg.value)
                    .ok_or_else(|| format!("unrecognised color {:?}", bg.value))?;
                let rect = page_rect(w, h)?;
                surface.fill_rect(rect, &solid_paint(color, 1.0), Transform::identity(), None);
            }
            BackgroundKind::Gradient => {
                let stops = gradient_stops(&bg.value)
                    .ok_or_else(|| format!("no color stops in {:?}", bg.value))?;
                let paint = linear_paint(Point::from_xy(0.0, 0.0), Point::from_xy(w, h), stops, 1.0);
                surface.fill_rect(page_rect(w, h)?, &paint, Transform::identity(), None);
            }
            BackgroundKind::Image => {
                let image = self.cache.get_or_load(&bg.value).map_err(|e| e.to_string())?;
                let ts = background_transform(bg, w, h, image.width(), image.height());
                let paint = PixmapPaint {
                    opacity: bg.opacity.clamp(0.0, 1.0),
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                surface.draw_pixmap(0, 0, Pixmap::as_ref(&image), &paint, ts, None);
            }
        }
        Ok(())
    }

    fn paint_element(&mut self, surface: &mut Pixmap, element: &Element) -> Result<(), String> {
        let t = &element.transform;
        let Some(rect) = Rect::from_xywh(t.x, t.y, t.width, t.height) else {
            // zero-area boxes draw nothing
            return Ok(());
        };
        let ts = element_transform(t);
        let opacity = element.style.effective_opacity();
        let style = &element.style;

        match &element.kind {
            ElementKind::Image { src } | ElementKind::Logo { src } => {
                let image = self.cache.get_or_load(src).map_err(|e| e.to_string())?;
                #[allow(clippy::cast_precision_loss)]
                let stretch = ts.pre_translate(t.x, t.y).pre_scale(
                    t.width / image.width() as f32,
                    t.height / image.height() as f32,
                );
                let paint = PixmapPaint {
                    opacity,
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                surface.draw_pixmap(0, 0, Pixmap::as_ref(&image), &paint, stretch, None);
            }
            ElementKind::Shape { color } => {
                let token = style.background_color.as_deref().unwrap_or(color);
                let fill = Rgba::parse(token)
                    .ok_or_else(|| format!("unrecognised color {token:?}"))?;
                let radius = style.border_radius.unwrap_or(0.0);
                let path = if radius > 100.0 {
                    tiny_skia::PathBuilder::from_oval(rect)
                } else {
                    rounded_rect(rect, radius)
                };
                if let Some(path) = path {
                    surface.fill_path(&path, &solid_paint(fill, opacity), FillRule::Winding, ts, None);
                    stroke_outline(surface, &path, element, opacity, ts);
                }
            }
            ElementKind::Text { .. } | ElementKind::Cta { .. } => {
                if let Some(token) = style.background_color.as_deref() {
                    let fill = Rgba::parse(token)
                        .ok_or_else(|| format!("unrecognised color {token:?}"))?;
                    if let Some(path) = rounded_rect(rect, style.border_radius.unwrap_or(0.0)) {
                        surface.fill_path(&path, &solid_paint(fill, opacity), FillRule::Winding, ts, None);
                        stroke_outline(surface, &path, element, opacity, ts);
                    }
                }
                self.text
                    .draw(surface, element, ts, opacity)
                    .map_err(|e| e.to_string())?;
            }
        }
        Ok(())
    }
}

fn page_rect(w: f32, h: f32) -> Result<Rect, String> {
    Rect::from_xywh(0.0, 0.0, w, h).ok_or_else(|| format!("invalid page size {w}x{h}"))
}

fn stroke_outline(
    surface: &mut Pixmap,
    path: &tiny_skia::Path,
    element: &Element,
    opacity: f32,
    ts: Transform,
) {
    let Some(width) = element.style.border_width.filter(|w| *w > 0.0) else {
        return;
    };
    let color = element
        .style
        .border_color
        .as_deref()
        .and_then(Rgba::parse)
        .unwrap_or(Rgba::BLACK);
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    surface.stroke_path(path, &solid_paint(color, opacity), &stroke, ts, None);
}
