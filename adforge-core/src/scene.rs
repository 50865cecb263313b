//! Scene graph: the element list, the background and the page format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::{Background, CoreError, CoreResult, Element, ElementId};

/// Canonical page height in pixels; widths derive from the aspect ratio.
pub const BASE_HEIGHT: u32 = 1080;

/// Supported page formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square post.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 story.
    #[serde(rename = "9:16")]
    Story,
    /// 3:4 portrait.
    #[serde(rename = "3:4")]
    Portrait,
    /// 4:5 feed portrait.
    #[serde(rename = "4:5")]
    Feed,
}

impl AspectRatio {
    /// All supported ratios.
    pub const ALL: [Self; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Story,
        Self::Portrait,
        Self::Feed,
    ];

    /// The ratio as `(width, height)` integers.
    #[must_use]
    pub const fn parts(self) -> (u32, u32) {
        match self {
            Self::Square => (1, 1),
            Self::Landscape => (16, 9),
            Self::Story => (9, 16),
            Self::Portrait => (3, 4),
            Self::Feed => (4, 5),
        }
    }

    /// The `w:h` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Story => "9:16",
            Self::Portrait => "3:4",
            Self::Feed => "4:5",
        }
    }

    /// Fixed render surface size: height is [`BASE_HEIGHT`], width follows the ratio.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn dimensions(self) -> (u32, u32) {
        let (w, h) = self.parts();
        let width = (f64::from(BASE_HEIGHT) * f64::from(w) / f64::from(h)).round() as u32;
        (width, BASE_HEIGHT)
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| CoreError::InvalidOperation(format!("unsupported aspect ratio: {s}")))
    }
}

/// A scene containing all banner elements.
///
/// Elements are kept in insertion order; paint order is ascending z-index with
/// ties broken by that insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// All elements, in insertion order.
    elements: Vec<Element>,
    /// The page background.
    pub background: Background,
    /// The page format.
    pub aspect_ratio: AspectRatio,
}

impl Scene {
    /// Create a new empty scene with the given page format.
    #[must_use]
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            elements: Vec::new(),
            background: Background::default(),
            aspect_ratio,
        }
    }

    /// Page width in pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width(&self) -> f32 {
        self.aspect_ratio.dimensions().0 as f32
    }

    /// Page height in pixels.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn height(&self) -> f32 {
        self.aspect_ratio.dimensions().1 as f32
    }

    /// Page center.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }

    /// Add an element to the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if an element with the same ID already exists.
    pub fn add_element(&mut self, element: Element) -> CoreResult<ElementId> {
        let id = element.id;
        if self.contains(id) {
            return Err(CoreError::InvalidOperation(format!(
                "duplicate element id {id}"
            )));
        }
        self.elements.push(element);
        Ok(id)
    }

    /// Remove an element from the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the element is not found.
    pub fn remove_element(&mut self, id: ElementId) -> CoreResult<Element> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| CoreError::ElementNotFound(id.to_string()))?;
        Ok(self.elements.remove(index))
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get_element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    /// Whether the scene holds an element with this ID.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.get_element(id).is_some()
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    /// Elements sorted into paint order (bottom first).
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        let mut ordered: Vec<&Element> = self.elements.iter().collect();
        // stable sort keeps insertion order for equal z-indices
        ordered.sort_by_key(|e| e.z_index());
        ordered
    }

    /// Highest z-index in use.
    #[must_use]
    pub fn max_z_index(&self) -> Option<i32> {
        self.elements.iter().map(Element::z_index).max()
    }

    /// Lowest z-index in use.
    #[must_use]
    pub fn min_z_index(&self) -> Option<i32> {
        self.elements.iter().map(Element::z_index).min()
    }

    /// Find the topmost element containing the given page-space point.
    #[must_use]
    pub fn element_at(&self, point: Point) -> Option<ElementId> {
        self.paint_order()
            .into_iter()
            .rev()
            .find(|e| e.contains_point(point))
            .map(|e| e.id)
    }

    /// Replace the element list and background wholesale (snapshot restore).
    pub fn restore(&mut self, elements: Vec<Element>, background: Background) {
        self.elements = elements;
        self.background = background;
    }

    /// Take a copy of the element list.
    #[must_use]
    pub fn elements_snapshot(&self) -> Vec<Element> {
        self.elements.clone()
    }

    /// Get the number of elements in the scene.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check if the scene is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize the scene to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CoreResult<String> {
        serde_json::to_string(self).map_err(CoreError::Serialization)
    }

    /// Deserialize a scene from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or element IDs collide.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let scene: Self = serde_json::from_str(json).map_err(CoreError::Serialization)?;
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = scene.elements.iter().find(|e| !seen.insert(e.id)) {
            return Err(CoreError::InvalidOperation(format!(
                "duplicate element id {}",
                dup.id
            )));
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ElementKind, Style, Transform};

    fn text(content: &str, z: i32) -> Element {
        Element::new(ElementKind::Text {
            content: content.to_string(),
        })
        .with_style(Style {
            z_index: z,
            ..Style::default()
        })
    }

    #[test]
    fn test_scene_add_remove() {
        let mut scene = Scene::new(AspectRatio::Square);
        assert!(scene.is_empty());

        let id = scene.add_element(text("Hello", 0)).expect("add");
        assert_eq!(scene.element_count(), 1);
        assert!(scene.get_element(id).is_some());

        scene.remove_element(id).expect("should remove");
        assert!(scene.is_empty());
        assert!(scene.remove_element(id).is_err());
    }

    #[test]
    fn test_dimensions_follow_ratio() {
        assert_eq!(AspectRatio::Square.dimensions(), (1080, 1080));
        assert_eq!(AspectRatio::Landscape.dimensions(), (1920, 1080));
        assert_eq!(AspectRatio::Story.dimensions(), (608, 1080));
        assert_eq!(AspectRatio::Portrait.dimensions(), (810, 1080));
        assert_eq!(AspectRatio::Feed.dimensions(), (864, 1080));
        assert_eq!("4:5".parse::<AspectRatio>().expect("parse"), AspectRatio::Feed);
        assert!("2:1".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_paint_order_ties_use_insertion_order() {
        let mut scene = Scene::new(AspectRatio::Square);
        let a = scene.add_element(text("a", 5)).expect("add");
        let b = scene.add_element(text("b", 1)).expect("add");
        let c = scene.add_element(text("c", 5)).expect("add");
        let order: Vec<_> = scene.paint_order().iter().map(|e| e.id).collect();
        assert_eq!(order, vec![b, a, c]);
    }

    #[test]
    fn test_element_at_picks_topmost() {
        let mut scene = Scene::new(AspectRatio::Square);
        let boxed = Transform {
            x: 100.0,
            y: 100.0,
            width: 200.0,
            height: 50.0,
            ..Transform::default()
        };
        let low = scene
            .add_element(text("low", 1).with_transform(boxed))
            .expect("add");
        let high = scene
            .add_element(text("high", 2).with_transform(boxed))
            .expect("add");

        assert_eq!(scene.element_at(Point::new(150.0, 125.0)), Some(high));
        scene.remove_element(high).expect("remove");
        assert_eq!(scene.element_at(Point::new(150.0, 125.0)), Some(low));
        assert!(scene.element_at(Point::new(50.0, 50.0)).is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_scene() {
        let mut scene = Scene::new(AspectRatio::Landscape);
        scene.add_element(text("Sale", 3)).expect("add");
        let json = scene.to_json().expect("to json");
        assert!(json.contains("\"aspectRatio\":\"16:9\""));
        let back = Scene::from_json(&json).expect("from json");
        assert_eq!(back, scene);
    }
}
