//! Scene elements - the positioned, styled building blocks of a banner.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::Point;

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What an element is, together with its kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// A single line of text.
    Text {
        /// Literal text.
        content: String,
    },

    /// A call-to-action button label.
    Cta {
        /// Literal label text.
        content: String,
    },

    /// A raster image.
    Image {
        /// Image URI or `data:` payload.
        src: String,
    },

    /// A brand logo (raster).
    Logo {
        /// Image URI or `data:` payload.
        src: String,
    },

    /// A filled rectangle, rounded rectangle or ellipse.
    Shape {
        /// Fallback fill color token when no background color is styled.
        color: String,
    },
}

impl ElementKind {
    /// Lowercase kind tag.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Cta { .. } => "cta",
            Self::Image { .. } => "image",
            Self::Logo { .. } => "logo",
            Self::Shape { .. } => "shape",
        }
    }

    /// Whether the element renders text (text and cta kinds).
    #[must_use]
    pub const fn is_textual(&self) -> bool {
        matches!(self, Self::Text { .. } | Self::Cta { .. })
    }

    /// Whether the element draws a bitmap (image and logo kinds).
    #[must_use]
    pub const fn is_raster(&self) -> bool {
        matches!(self, Self::Image { .. } | Self::Logo { .. })
    }

    /// The kind-dependent payload: text, image reference or color token.
    #[must_use]
    pub fn content(&self) -> &str {
        match self {
            Self::Text { content } | Self::Cta { content } => content,
            Self::Image { src } | Self::Logo { src } => src,
            Self::Shape { color } => color,
        }
    }

    /// Replace the kind-dependent payload.
    pub fn set_content(&mut self, value: String) {
        match self {
            Self::Text { content } | Self::Cta { content } => *content = value,
            Self::Image { src } | Self::Logo { src } => *src = value,
            Self::Shape { color } => *color = value,
        }
    }
}

/// Geometry of an element in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// X position of the top-left corner.
    pub x: f32,
    /// Y position of the top-left corner.
    pub y: f32,
    /// Unrotated, unscaled width.
    pub width: f32,
    /// Unrotated, unscaled height.
    pub height: f32,
    /// Rotation in degrees, clockwise, about the box center.
    pub rotation: f32,
    /// Horizontal scale multiplier (negative = mirrored).
    pub scale_x: f32,
    /// Vertical scale multiplier (negative = mirrored).
    pub scale_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Transform {
    /// Center of the unrotated box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor at the left edge.
    Left,
    /// Anchor at the horizontal center.
    #[default]
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Resolved fill of a textual element.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill<'a> {
    /// Solid color token.
    Solid(&'a str),
    /// Gradient descriptor.
    Gradient(&'a str),
}

/// Optional visual attributes of an element.
///
/// `color` and `gradient` are mutually exclusive; the patch layer clears one
/// whenever the other is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    /// CSS-like weight: `normal`, `bold` or a number such as `600`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// `normal` or `italic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    /// `none`, `underline` or `line-through`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f32>,
    /// 0 (transparent) to 1 (opaque).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Paint order; ascending values paint later.
    pub z_index: i32,
}

impl Style {
    /// The resolved text fill, gradient taking precedence.
    #[must_use]
    pub fn fill(&self) -> Option<Fill<'_>> {
        self.gradient
            .as_deref()
            .map(Fill::Gradient)
            .or_else(|| self.color.as_deref().map(Fill::Solid))
    }

    /// Set a solid fill, clearing any gradient.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.color = Some(color.into());
        self.gradient = None;
    }

    /// Set a gradient fill, clearing any solid color.
    pub fn set_gradient(&mut self, gradient: impl Into<String>) {
        self.gradient = Some(gradient.into());
        self.color = None;
    }

    /// Opacity clamped to `0..=1`, defaulting to opaque.
    #[must_use]
    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }
}

/// A positioned visual unit of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Kind and payload.
    pub kind: ElementKind,
    /// Position, size, rotation and scale.
    pub transform: Transform,
    /// Visual attributes.
    pub style: Style,
    /// Optional grouping tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Locked elements ignore every mutation except unlocking.
    #[serde(default)]
    pub locked: bool,
}

impl Element {
    /// Create a new element with the given kind.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            transform: Transform::default(),
            style: Style::default(),
            group_id: None,
            locked: false,
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Paint order of this element.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.style.z_index
    }

    /// Check if a page-space point is within the (rotated, scaled) element box.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        crate::geometry::contains_point(&self.transform, point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_color_clears_gradient() {
        let mut style = Style::default();
        style.set_gradient("linear-gradient(90deg, #000, #fff)");
        style.set_color("#ff0000");
        assert_eq!(style.gradient, None);
        assert_eq!(style.fill(), Some(Fill::Solid("#ff0000")));

        style.set_gradient("linear-gradient(90deg, #000, #fff)");
        assert_eq!(style.color, None);
    }

    #[test]
    fn test_kind_content_roundtrip() {
        let mut kind = ElementKind::Logo {
            src: "a.png".to_string(),
        };
        kind.set_content("b.png".to_string());
        assert_eq!(kind.content(), "b.png");
        assert!(kind.is_raster());
        assert!(!kind.is_textual());
    }

    #[test]
    fn test_style_serializes_camel_case_without_nones() {
        let style = Style {
            font_size: Some(64.0),
            z_index: 3,
            ..Style::default()
        };
        let json = serde_json::to_value(&style).expect("serialize");
        assert_eq!(json, serde_json::json!({"fontSize": 64.0, "zIndex": 3}));
    }
}
