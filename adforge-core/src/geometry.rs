//! Pure geometry helpers: snapping, rotation from pointer position and
//! bounding-box math for hit testing and alignment.
//!
//! All coordinates are page-space unless a function says otherwise.

use serde::{Deserialize, Serialize};

use crate::element::Transform;

/// A point (or displacement) in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Euclidean length when the point is used as a displacement.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Convert a view-space value to page space for the given zoom factor.
    #[must_use]
    pub fn to_page(self, zoom: f32) -> Self {
        let zoom = if zoom > f32::EPSILON { zoom } else { 1.0 };
        Self::new(self.x / zoom, self.y / zoom)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub min_x: f32,
    /// Top edge.
    pub min_y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl Bounds {
    /// Bounds of an unrotated box.
    #[must_use]
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Smallest box containing both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Width of the box.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Center of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// Snap a center coordinate onto `target` when it lies within `threshold`.
///
/// Returns the snapped coordinate, or `None` when no snap applies.
#[must_use]
pub fn snap_to_center(center: f32, target: f32, threshold: f32) -> Option<f32> {
    ((center - target).abs() < threshold).then_some(target)
}

/// Rotation (degrees, clockwise, in `[0, 360)`) that points an element's top
/// edge towards `pointer`.
///
/// This is the arctangent of the pointer relative to `center`, offset by 90°
/// so that a pointer straight above the center yields 0°.
#[must_use]
pub fn rotation_from_pointer(center: Point, pointer: Point) -> f32 {
    let d = pointer.delta_from(center);
    normalize_degrees(d.y.atan2(d.x).to_degrees() + 90.0)
}

/// Snap `angle` to the nearest multiple of `step` when within `tolerance` of it.
#[must_use]
pub fn snap_rotation(angle: f32, step: f32, tolerance: f32) -> f32 {
    if step <= 0.0 {
        return angle;
    }
    let nearest = (angle / step).round() * step;
    if (angle - nearest).abs() < tolerance {
        normalize_degrees(nearest)
    } else {
        angle
    }
}

/// Wrap an angle into `[0, 360)`.
#[must_use]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// The four corners of an element box after rotation and scale about its center,
/// clockwise from the top-left.
#[must_use]
pub fn corners(t: &Transform) -> [Point; 4] {
    let c = t.center();
    let hw = t.width / 2.0;
    let hh = t.height / 2.0;
    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(lx, ly)| local_to_page(t, c, lx, ly))
}

/// Axis-aligned bounds of the visual (rotated, scaled) element box.
#[must_use]
pub fn visual_bounds(t: &Transform) -> Bounds {
    let [a, b, c, d] = corners(t);
    Bounds {
        min_x: a.x.min(b.x).min(c.x).min(d.x),
        min_y: a.y.min(b.y).min(c.y).min(d.y),
        max_x: a.x.max(b.x).max(c.x).max(d.x),
        max_y: a.y.max(b.y).max(c.y).max(d.y),
    }
}

/// Map a page point into the element's unrotated, unscaled local frame,
/// relative to the element center.
#[must_use]
pub fn page_to_local(t: &Transform, p: Point) -> Point {
    let c = t.center();
    let (sin, cos) = (-t.rotation.to_radians()).sin_cos();
    let d = p.delta_from(c);
    let rx = d.x * cos - d.y * sin;
    let ry = d.x * sin + d.y * cos;
    let sx = if t.scale_x.abs() > f32::EPSILON { t.scale_x } else { 1.0 };
    let sy = if t.scale_y.abs() > f32::EPSILON { t.scale_y } else { 1.0 };
    Point::new(rx / sx, ry / sy)
}

/// Whether `p` lies inside the rotated, scaled element box.
#[must_use]
pub fn contains_point(t: &Transform, p: Point) -> bool {
    let local = page_to_local(t, p);
    local.x.abs() <= t.width / 2.0 && local.y.abs() <= t.height / 2.0
}

/// Map a point given in the element's local frame (relative to center) to page space.
#[must_use]
pub fn local_to_page(t: &Transform, center: Point, lx: f32, ly: f32) -> Point {
    let (sin, cos) = t.rotation.to_radians().sin_cos();
    let x = lx * t.scale_x;
    let y = ly * t.scale_y;
    Point::new(center.x + x * cos - y * sin, center.y + x * sin + y * cos)
}
