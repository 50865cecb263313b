//! Default content and geometry for newly added elements.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementKind, Style, TextAlign, Transform};

/// Default fill for new shapes.
const SHAPE_COLOR: &str = "#3b82f6";
/// Default button color for new calls to action.
const CTA_BACKGROUND: &str = "#2563eb";

/// What to add, and in which flavour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "camelCase")]
pub enum ElementTemplate {
    /// Large bold headline text.
    Heading,
    /// Secondary headline text.
    Subheading,
    /// Body copy.
    Body,
    /// Call-to-action button.
    Cta,
    /// A picture.
    Image {
        /// Image URI or `data:` payload.
        src: String,
    },
    /// A brand mark, placed in the top-left corner.
    Logo {
        /// Image URI or `data:` payload.
        src: String,
    },
    /// Plain rectangle.
    Rectangle,
    /// Rectangle with softened corners.
    RoundedRectangle,
    /// Ellipse inscribed in a square box.
    Circle,
}

impl ElementTemplate {
    /// Build the element for a page of the given size, painted at `z_index`.
    #[must_use]
    pub fn build(&self, page_width: f32, page_height: f32, z_index: i32) -> Element {
        let centered = |width: f32, height: f32, y: f32| {
            let width = width.min(page_width);
            Transform {
                x: (page_width - width) / 2.0,
                y,
                width,
                height,
                ..Transform::default()
            }
        };
        let base = Style {
            z_index,
            ..Style::default()
        };

        let (kind, transform, style) = match self {
            Self::Heading => (
                text("Add a heading"),
                centered(800.0, 100.0, page_height * 0.12),
                Style {
                    font_size: Some(64.0),
                    font_weight: Some("bold".to_string()),
                    ..typography(base)
                },
            ),
            Self::Subheading => (
                text("Add a subheading"),
                centered(700.0, 70.0, page_height * 0.25),
                Style {
                    font_size: Some(40.0),
                    font_weight: Some("600".to_string()),
                    ..typography(base)
                },
            ),
            Self::Body => (
                text("Add a little bit of body text"),
                centered(600.0, 50.0, page_height * 0.35),
                Style {
                    font_size: Some(24.0),
                    font_weight: Some("normal".to_string()),
                    ..typography(base)
                },
            ),
            Self::Cta => (
                ElementKind::Cta {
                    content: "Shop Now".to_string(),
                },
                centered(280.0, 80.0, page_height - 200.0),
                Style {
                    font_size: Some(28.0),
                    font_weight: Some("bold".to_string()),
                    background_color: Some(CTA_BACKGROUND.to_string()),
                    border_radius: Some(40.0),
                    padding: Some(16.0),
                    ..typography(base)
                },
            ),
            Self::Image { src } => (
                ElementKind::Image { src: src.clone() },
                centered(400.0, 400.0, (page_height - 400.0) / 2.0),
                base,
            ),
            Self::Logo { src } => (
                ElementKind::Logo { src: src.clone() },
                Transform {
                    x: 40.0,
                    y: 40.0,
                    width: 160.0,
                    height: 160.0,
                    ..Transform::default()
                },
                base,
            ),
            Self::Rectangle | Self::RoundedRectangle | Self::Circle => {
                let (w, h, radius) = match self {
                    Self::Rectangle => (300.0, 200.0, 0.0),
                    Self::RoundedRectangle => (300.0, 200.0, 24.0),
                    _ => (240.0, 240.0, 9999.0),
                };
                (
                    ElementKind::Shape {
                        color: SHAPE_COLOR.to_string(),
                    },
                    centered(w, h, (page_height - h) / 2.0),
                    Style {
                        background_color: Some(SHAPE_COLOR.to_string()),
                        border_radius: Some(radius),
                        ..base
                    },
                )
            }
        };

        Element::new(kind).with_transform(transform).with_style(style)
    }
}

fn text(content: &str) -> ElementKind {
    ElementKind::Text {
        content: content.to_string(),
    }
}

fn typography(base: Style) -> Style {
    Style {
        font_family: Some("Inter".to_string()),
        color: Some("#ffffff".to_string()),
        text_align: Some(TextAlign::Center),
        ..base
    }
}

/// Text produced for one banner of a campaign.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerCopy {
    /// Main line; becomes a heading.
    pub headline: String,
    /// Supporting line; becomes a subheading.
    pub subheadline: String,
    /// Button label; becomes a call to action.
    pub cta: String,
}

impl BannerCopy {
    /// Elements for every non-empty line, each at its template's default position.
    #[must_use]
    pub fn elements(&self, page_width: f32, page_height: f32, first_z: i32) -> Vec<Element> {
        [
            (ElementTemplate::Heading, &self.headline),
            (ElementTemplate::Subheading, &self.subheadline),
            (ElementTemplate::Cta, &self.cta),
        ]
        .into_iter()
        .filter(|(_, line)| !line.trim().is_empty())
        .zip(first_z..)
        .map(|((template, line), z)| {
            let mut el = template.build(page_width, page_height, z);
            el.kind.set_content(line.trim().to_string());
            el
        })
        .collect()
    }
}
