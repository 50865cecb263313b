//! Image source loading.
//!
//! Sources are `data:` URIs (base64 or percent-encoded) or local file paths.
//! Remote URLs are never fetched here; callers download them and insert the
//! bytes into the [`crate::SourceCache`].

use base64::Engine;
use tiny_skia::{ColorU8, Pixmap};

use crate::error::{RenderError, RenderResult};

/// Raster formats recognised by sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from MIME type.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/webp" => Self::WebP,
            _ => Self::Unknown,
        }
    }

    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Self::Png
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Self::Jpeg
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Self::WebP
        } else {
            Self::Unknown
        }
    }

    /// MIME type for a data URI.
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
            Self::Unknown => "application/octet-stream",
        }
    }
}

/// Read the encoded bytes behind an image source.
///
/// # Errors
///
/// Returns an error for empty or remote sources, malformed data URIs and
/// unreadable files.
pub fn load_source_bytes(src: &str) -> RenderResult<Vec<u8>> {
    let src = src.trim();
    if src.is_empty() {
        return Err(RenderError::Resource("empty image source".to_string()));
    }
    if src.starts_with("data:") {
        return decode_data_uri(src);
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Err(RenderError::Resource(format!(
            "remote source {src} must be fetched into the cache before rendering"
        )));
    }
    let path = src.strip_prefix("file://").unwrap_or(src);
    std::fs::read(path).map_err(|e| RenderError::Resource(format!("{path}: {e}")))
}

/// Extract the payload of a data URI.
///
/// Supports formats like: `data:image/png;base64,iVBORw0KGgo...`
///
/// # Errors
///
/// Returns an error if the data URI is malformed.
pub fn decode_data_uri(uri: &str) -> RenderResult<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;
    let (metadata, payload) = rest
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))
    } else {
        percent_decode(payload)
    }
}

fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}

/// Decode encoded image bytes into a premultiplied pixmap.
///
/// # Errors
///
/// Returns an error if the bytes are not a decodable image or have zero size.
pub fn decode_image(data: &[u8]) -> RenderResult<Pixmap> {
    let rgba = image::load_from_memory(data)
        .map_err(|e| {
            RenderError::Resource(format!(
                "Failed to decode {:?} image: {e}",
                ImageFormat::from_magic_bytes(data)
            ))
        })?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::Resource(format!("invalid image size {width}x{height}")))?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
