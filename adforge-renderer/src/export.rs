//! Encoding of rendered surfaces.
//!
//! PNG goes through tiny-skia's encoder; JPEG flattens alpha onto a backdrop
//! and goes through the image crate.

use base64::Engine;
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};
use crate::image::ImageFormat;

/// Export output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image, alpha flattened onto white.
    Jpeg,
}

impl ExportFormat {
    /// MIME type of the encoded bytes.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => ImageFormat::Png.mime(),
            Self::Jpeg => ImageFormat::Jpeg.mime(),
        }
    }
}

/// Encode a surface in `format`.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode(surface: &Pixmap, format: ExportFormat, jpeg_quality: u8) -> RenderResult<Vec<u8>> {
    match format {
        ExportFormat::Png => encode_png(surface),
        ExportFormat::Jpeg => encode_jpeg(surface, jpeg_quality, [255, 255, 255]),
    }
}

/// Encode a surface as PNG.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn encode_png(surface: &Pixmap) -> RenderResult<Vec<u8>> {
    surface
        .encode_png()
        .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
}

/// Encode a surface as JPEG over an opaque backdrop color.
///
/// # Errors
///
/// Returns an error if encoding fails.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_jpeg(surface: &Pixmap, quality: u8, backdrop: [u8; 3]) -> RenderResult<Vec<u8>> {
    let (width, height) = (surface.width(), surface.height());
    let mut rgb = Vec::with_capacity(surface.pixels().len() * 3);
    // pixels are premultiplied, so compositing over the backdrop is src + bg * (1 - a)
    for px in surface.pixels() {
        let inv = 1.0 - f32::from(px.alpha()) / 255.0;
        for (channel, bg) in [px.red(), px.green(), px.blue()].into_iter().zip(backdrop) {
            rgb.push(f32::from(bg).mul_add(inv, f32::from(channel)).round().min(255.0) as u8);
        }
    }

    let mut buf = std::io::Cursor::new(Vec::new());
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    encoder
        .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| RenderError::Encode(format!("JPEG encoding failed: {e}")))?;
    Ok(buf.into_inner())
}

/// Wrap encoded bytes in a base64 `data:` URI.
#[must_use]
pub fn to_data_uri(bytes: &[u8], format: ExportFormat) -> String {
    format!(
        "data:{};base64,{}",
        format.mime(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
