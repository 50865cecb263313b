//! tiny-skia building blocks shared by the background and element passes.

use adforge_core::{background::clamp_scale, Background, Rgba};
use tiny_skia::{
    Color, GradientStop, LinearGradient, Paint, Path, PathBuilder, Point, Rect, SpreadMode,
    Transform,
};

/// Cubic Bézier control distance for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_75;

/// A straight-alpha color with an extra opacity factor.
pub(crate) fn skia_color(color: Rgba, opacity: f32) -> Color {
    let c = color.with_opacity(opacity);
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Anti-aliased solid paint.
pub(crate) fn solid_paint(color: Rgba, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color, opacity));
    paint.anti_alias = true;
    paint
}

/// Anti-aliased two-stop linear gradient paint from `start` to `end`.
///
/// Falls back to the first stop when the gradient line is degenerate.
pub(crate) fn linear_paint(
    start: Point,
    end: Point,
    (first, last): (Rgba, Rgba),
    opacity: f32,
) -> Paint<'static> {
    let stops = vec![
        GradientStop::new(0.0, skia_color(first, opacity)),
        GradientStop::new(1.0, skia_color(last, opacity)),
    ];
    match LinearGradient::new(start, end, stops, SpreadMode::Pad, Transform::identity()) {
        Some(shader) => Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        },
        None => solid_paint(first, opacity),
    }
}

/// A rectangle with circular corners of `radius`, clamped to half the
/// shorter side.
pub(crate) fn rounded_rect(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    if r.is_nan() || r <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }
    let (l, t, rt, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let k = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + k, t, rt, t + r - k, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + k, rt - r + k, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - k, b, l, b - r + k, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - k, l + r - k, t, l + r, t);
    pb.close();
    pb.finish()
}

/// Rotation and scale about the element's center.
pub(crate) fn element_transform(t: &adforge_core::Transform) -> Transform {
    let c = t.center();
    Transform::from_translate(c.x, c.y)
        .pre_concat(Transform::from_rotate(t.rotation))
        .pre_scale(t.scale_x, t.scale_y)
        .pre_translate(-c.x, -c.y)
}

/// Image-space to page-space mapping for a background image.
///
/// The page-centered zoom and pan are applied on top of a centered cover fit.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn background_transform(
    bg: &Background,
    page_width: f32,
    page_height: f32,
    image_width: u32,
    image_height: u32,
) -> Transform {
    let (iw, ih) = (image_width as f32, image_height as f32);
    let (cx, cy) = (page_width / 2.0, page_height / 2.0);
    let cover = (page_width / iw).max(page_height / ih);
    let scale = clamp_scale(bg.scale);

    Transform::from_translate(cx + bg.x, cy + bg.y)
        .pre_scale(scale, scale)
        .pre_translate(-cx, -cy)
        .pre_translate((page_width - iw * cover) / 2.0, (page_height - ih * cover) / 2.0)
        .pre_scale(cover, cover)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(ts: Transform, x: f32, y: f32) -> (f32, f32) {
        let mut p = [Point::from_xy(x, y)];
        ts.map_points(&mut p);
        (p[0].x, p[0].y)
    }

    #[test]
    fn test_cover_fit_centers_wide_image() {
        let bg = Background::image("bg.png");
        let ts = background_transform(&bg, 1080.0, 1080.0, 200, 100);
        // height-bound: 100 px -> 1080, so 200 px -> 2160, centered
        let (x0, y0) = map(ts, 0.0, 0.0);
        let (x1, y1) = map(ts, 200.0, 100.0);
        assert!((x0 + 540.0).abs() < 1e-3 && y0.abs() < 1e-3);
        assert!((x1 - 1620.0).abs() < 1e-3 && (y1 - 1080.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_and_pan_about_page_center() {
        let mut bg = Background::image("bg.png");
        bg.scale = 2.0;
        bg.x = 50.0;
        bg.y = -30.0;
        let ts = background_transform(&bg, 1080.0, 1080.0, 100, 100);
        // the image center lands on page center plus pan
        let (cx, cy) = map(ts, 50.0, 50.0);
        assert!((cx - 590.0).abs() < 1e-3 && (cy - 510.0).abs() < 1e-3);
        let (x0, _) = map(ts, 0.0, 0.0);
        assert!((x0 - (590.0 - 1080.0)).abs() < 1e-3);
    }

    #[test]
    fn test_element_transform_rotates_about_center() {
        let t = adforge_core::Transform {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            rotation: 90.0,
            ..adforge_core::Transform::default()
        };
        let (x, y) = map(element_transform(&t), 100.0, 25.0);
        assert!((x - 50.0).abs() < 1e-3 && (y - 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_rounded_rect_clamps_radius() {
        let rect = Rect::from_xywh(0.0, 0.0, 40.0, 20.0).expect("rect");
        let path = rounded_rect(rect, 500.0).expect("path");
        let b = path.bounds();
        assert!((b.width() - 40.0).abs() < 1e-3 && (b.height() - 20.0).abs() < 1e-3);
    }
}
