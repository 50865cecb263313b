//! The page-level paint layer beneath all elements.

use serde::{Deserialize, Serialize};

/// Smallest background image zoom.
pub const MIN_BACKGROUND_SCALE: f32 = 0.5;
/// Largest background image zoom.
pub const MAX_BACKGROUND_SCALE: f32 = 5.0;

/// How the background is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    /// A raster image, cover-fit, with pan and zoom.
    Image,
    /// A solid color.
    Color,
    /// A two-stop linear gradient.
    Gradient,
}

/// The single background layer of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// Paint kind.
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    /// Image URI / `data:` payload, color token, or gradient descriptor.
    pub value: String,
    /// 0 (transparent) to 1 (opaque).
    pub opacity: f32,
    /// Image zoom, 1 = natural cover fit. Only meaningful for images.
    pub scale: f32,
    /// Horizontal pan in page pixels. Only meaningful for images.
    pub x: f32,
    /// Vertical pan in page pixels. Only meaningful for images.
    pub y: f32,
}

impl Default for Background {
    fn default() -> Self {
        Self::color("#111827")
    }
}

impl Background {
    /// Solid color background.
    #[must_use]
    pub fn color(value: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Color,
            value: value.into(),
            opacity: 1.0,
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Gradient background.
    #[must_use]
    pub fn gradient(descriptor: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            ..Self::color(descriptor)
        }
    }

    /// Image background at natural cover fit with no pan.
    #[must_use]
    pub fn image(src: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Image,
            ..Self::color(src)
        }
    }

    /// Whether pan and zoom apply.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.kind == BackgroundKind::Image
    }

    /// Set the image zoom, clamped to the supported range.
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = clamp_scale(scale);
    }
}

/// Clamp a background zoom into `[MIN_BACKGROUND_SCALE, MAX_BACKGROUND_SCALE]`.
#[must_use]
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        return 1.0;
    }
    scale.clamp(MIN_BACKGROUND_SCALE, MAX_BACKGROUND_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_is_clamped() {
        let mut bg = Background::image("data:image/png;base64,AAAA");
        bg.set_scale(9.0);
        assert_eq!(bg.scale, MAX_BACKGROUND_SCALE);
        bg.set_scale(0.1);
        assert_eq!(bg.scale, MIN_BACKGROUND_SCALE);
    }

    #[test]
    fn test_serializes_kind_as_type() {
        let json = serde_json::to_value(Background::gradient("linear-gradient(#000, #fff)"))
            .expect("serialize");
        assert_eq!(json["type"], "gradient");
    }
}
