//! Single-line text drawing through resvg.
//!
//! Each text element becomes a tiny SVG document the size of the page with
//! one `<text>` node under the element's transform. usvg shapes it against a
//! font database loaded once per renderer, and resvg composites the result
//! over the surface.

use std::fmt::Write;
use std::sync::Arc;

use adforge_core::color::gradient_stops;
use adforge_core::{Element, Fill, Rgba, TextAlign};
use tiny_skia::{Pixmap, Transform};
use usvg::fontdb;

use crate::config::RendererConfig;
use crate::error::{RenderError, RenderResult};

/// Shapes and draws text with a shared font database.
#[derive(Clone)]
pub struct TextRenderer {
    fontdb: Arc<fontdb::Database>,
    default_family: String,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("faces", &self.fontdb.len())
            .field("default_family", &self.default_family)
            .finish()
    }
}

impl TextRenderer {
    /// Load fonts as configured.
    #[must_use]
    pub fn new(config: &RendererConfig) -> Self {
        let mut db = fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        for dir in &config.font_dirs {
            db.load_fonts_dir(dir);
        }
        tracing::debug!(faces = db.len(), "font database loaded");
        Self {
            fontdb: Arc::new(db),
            default_family: config.default_font_family.clone(),
        }
    }

    /// Draw the element's content as one line, anchored per its alignment and
    /// vertically centered in its box. Empty content draws nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated SVG fails to parse.
    pub fn draw(
        &self,
        surface: &mut Pixmap,
        element: &Element,
        transform: Transform,
        opacity: f32,
    ) -> RenderResult<()> {
        let content = element.kind.content();
        if content.trim().is_empty() {
            return Ok(());
        }
        let svg = self.svg_for(surface.width(), surface.height(), element, transform, opacity);

        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| RenderError::Resource(format!("text layout failed: {e}")))?;
        resvg::render(&tree, Transform::identity(), &mut surface.as_mut());
        Ok(())
    }

    fn svg_for(
        &self,
        width: u32,
        height: u32,
        element: &Element,
        ts: Transform,
        opacity: f32,
    ) -> String {
        let t = &element.transform;
        let style = &element.style;
        let padding = style.padding.unwrap_or(0.0);
        let (anchor, x) = match style.text_align.unwrap_or_default() {
            TextAlign::Left => ("start", t.x + padding),
            TextAlign::Center => ("middle", t.x + t.width / 2.0),
            TextAlign::Right => ("end", t.x + t.width - padding),
        };
        let y = t.y + t.height / 2.0;

        let mut svg = String::with_capacity(512);
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        );

        let fill = match style.fill() {
            Some(Fill::Gradient(desc)) => match gradient_stops(desc) {
                Some((first, last)) => {
                    let _ = write!(
                        svg,
                        "<defs><linearGradient id=\"fill\" gradientUnits=\"userSpaceOnUse\" x1=\"{}\" y1=\"0\" x2=\"{}\" y2=\"0\">{}{}</linearGradient></defs>",
                        t.x,
                        t.x + t.width,
                        stop(0.0, first),
                        stop(1.0, last),
                    );
                    "url(#fill)".to_string()
                }
                None => Rgba::WHITE.to_hex(),
            },
            Some(Fill::Solid(token)) => Rgba::parse(token).unwrap_or(Rgba::WHITE).to_hex(),
            None => Rgba::WHITE.to_hex(),
        };

        let family = style
            .font_family
            .as_deref()
            .unwrap_or(&self.default_family);
        let _ = write!(
            svg,
            "<g transform=\"matrix({} {} {} {} {} {})\" opacity=\"{opacity}\">",
            ts.sx, ts.ky, ts.kx, ts.sy, ts.tx, ts.ty,
        );
        let _ = write!(
            svg,
            "<text x=\"{x}\" y=\"{y}\" text-anchor=\"{anchor}\" dominant-baseline=\"central\" font-family=\"'{}', sans-serif\" font-size=\"{}\" font-weight=\"{}\" font-style=\"{}\" fill=\"{fill}\"",
            escape(family),
            style.font_size.unwrap_or(16.0),
            escape(style.font_weight.as_deref().unwrap_or("normal")),
            escape(style.font_style.as_deref().unwrap_or("normal")),
        );
        if let Some(spacing) = style.letter_spacing {
            let _ = write!(svg, " letter-spacing=\"{spacing}\"");
        }
        if let Some(decoration) = style.text_decoration.as_deref() {
            let _ = write!(svg, " text-decoration=\"{}\"", escape(decoration));
        }
        let _ = write!(
            svg,
            " xml:space=\"preserve\">{}</text></g></svg>",
            escape(element.kind.content())
        );
        svg
    }
}

fn stop(offset: f32, color: Rgba) -> String {
    format!(
        "<stop offset=\"{offset}\" stop-color=\"rgb({},{},{})\" stop-opacity=\"{}\"/>",
        color.r,
        color.g,
        color.b,
        f32::from(color.a) / 255.0
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}
