//! Render Integration Tests
//!
//! Composites whole scenes and checks sampled pixels:
//! - Determinism of repeated renders
//! - Background cover fit with pan and zoom
//! - Paint order and opacity
//! - Partial failure of broken sources
//! - Export encodings

use adforge_core::layers::reorder;
use adforge_core::{
    AspectRatio, Background, Element, ElementKind, ReorderMove, Scene, Style, Transform,
};
use adforge_renderer::export::{encode_png, to_data_uri};
use adforge_renderer::image::{decode_image, ImageFormat};
use adforge_renderer::{ExportFormat, Layer, Renderer, RendererConfig};
use tiny_skia::{Color, Pixmap};

/// A 100x100 PNG data URI with red, green, blue and yellow quadrants
/// (top-left, top-right, bottom-left, bottom-right).
fn quadrant_png() -> String {
    let mut pixmap = Pixmap::new(100, 100).expect("pixmap");
    let colors = [
        Color::from_rgba8(255, 0, 0, 255),
        Color::from_rgba8(0, 255, 0, 255),
        Color::from_rgba8(0, 0, 255, 255),
        Color::from_rgba8(255, 255, 0, 255),
    ];
    for y in 0..100_u32 {
        for x in 0..100_u32 {
            let quadrant = usize::from(x >= 50) + 2 * usize::from(y >= 50);
            let idx = (y * 100 + x) as usize;
            pixmap.pixels_mut()[idx] = colors[quadrant].premultiply().to_color_u8();
        }
    }
    to_data_uri(&encode_png(&pixmap).expect("png"), ExportFormat::Png)
}

fn renderer() -> Renderer {
    Renderer::new(RendererConfig::isolated())
}

fn shape(color: &str, x: f32, y: f32, w: f32, h: f32, z: i32) -> Element {
    Element::new(ElementKind::Shape {
        color: color.to_string(),
    })
    .with_transform(Transform {
        x,
        y,
        width: w,
        height: h,
        ..Transform::default()
    })
    .with_style(Style {
        z_index: z,
        ..Style::default()
    })
}

fn rgb_at(surface: &Pixmap, x: u32, y: u32) -> (u8, u8, u8, u8) {
    let px = surface.pixel(x, y).expect("pixel in bounds");
    (px.red(), px.green(), px.blue(), px.alpha())
}

fn near(actual: (u8, u8, u8, u8), expected: (u8, u8, u8)) -> bool {
    actual.0.abs_diff(expected.0) <= 8
        && actual.1.abs_diff(expected.1) <= 8
        && actual.2.abs_diff(expected.2) <= 8
}

// ============================================================================
// Surface Tests
// ============================================================================

#[test]
fn test_surface_size_follows_aspect_ratio() {
    let mut renderer = renderer();
    for ratio in AspectRatio::ALL {
        let report = renderer.render(&Scene::new(ratio)).expect("render");
        assert_eq!(
            (report.surface.width(), report.surface.height()),
            ratio.dimensions()
        );
    }
    assert_eq!(renderer.frame_count(), 5);
}

#[test]
fn test_repeated_renders_are_identical() {
    let mut scene = Scene::new(AspectRatio::Landscape);
    scene.background = Background::gradient("linear-gradient(135deg, #4f46e5, #ec4899)");
    scene
        .add_element(shape("#22c55e", 100.0, 100.0, 300.0, 200.0, 1))
        .expect("add");

    let mut renderer = renderer();
    let first = renderer.export(&scene, ExportFormat::Png).expect("export");
    let second = renderer.export(&scene, ExportFormat::Png).expect("export");
    assert_eq!(first.bytes, second.bytes);
}

#[test]
fn test_solid_background_fills_page() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("#ff8800");
    let report = renderer().render(&scene).expect("render");
    assert!(report.is_complete());
    assert!(near(rgb_at(&report.surface, 0, 0), (255, 136, 0)));
    assert!(near(rgb_at(&report.surface, 1079, 1079), (255, 136, 0)));
}

#[test]
fn test_gradient_runs_corner_to_corner() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::gradient("linear-gradient(135deg, #ff0000, #0000ff)");
    let report = renderer().render(&scene).expect("render");
    let top_left = rgb_at(&report.surface, 1, 1);
    let bottom_right = rgb_at(&report.surface, 1078, 1078);
    assert!(top_left.0 > 240 && top_left.2 < 15);
    assert!(bottom_right.2 > 240 && bottom_right.0 < 15);
}

// ============================================================================
// Background Image Tests
// ============================================================================

#[test]
fn test_background_zoom_and_pan_shift_quadrants() {
    let mut scene = Scene::new(AspectRatio::Square);
    let mut bg = Background::image(quadrant_png());
    bg.set_scale(2.0);
    bg.x = 50.0;
    bg.y = -30.0;
    scene.background = bg;

    let report = renderer().render(&scene).expect("render");
    assert!(report.is_complete(), "{:?}", report.failures);
    // the image center lands on (590, 510)
    let s = &report.surface;
    assert!(near(rgb_at(s, 560, 470), (255, 0, 0)));
    assert!(near(rgb_at(s, 640, 470), (0, 255, 0)));
    assert!(near(rgb_at(s, 560, 560), (0, 0, 255)));
    assert!(near(rgb_at(s, 640, 560), (255, 255, 0)));
}

#[test]
fn test_background_natural_fit_covers_page() {
    let mut scene = Scene::new(AspectRatio::Landscape);
    scene.background = Background::image(quadrant_png());
    let report = renderer().render(&scene).expect("render");
    let s = &report.surface;
    assert_eq!(rgb_at(s, 0, 0).3, 255);
    assert_eq!(rgb_at(s, 1919, 1079).3, 255);
    assert!(near(rgb_at(s, 100, 100), (255, 0, 0)));
    assert!(near(rgb_at(s, 1800, 1000), (255, 255, 0)));
}

// ============================================================================
// Element Tests
// ============================================================================

#[test]
fn test_higher_z_paints_on_top_and_reorder_changes_it() {
    let mut scene = Scene::new(AspectRatio::Square);
    let red = scene
        .add_element(shape("#ff0000", 100.0, 100.0, 200.0, 200.0, 1))
        .expect("add");
    scene
        .add_element(shape("#0000ff", 150.0, 150.0, 200.0, 200.0, 2))
        .expect("add");

    let mut renderer = renderer();
    let before = renderer.render(&scene).expect("render");
    assert!(near(rgb_at(&before.surface, 200, 200), (0, 0, 255)));

    assert!(reorder(&mut scene, red, ReorderMove::Front).expect("reorder"));
    let after = renderer.render(&scene).expect("render");
    assert!(near(rgb_at(&after.surface, 200, 200), (255, 0, 0)));
}

#[test]
fn test_locked_elements_still_render() {
    let mut scene = Scene::new(AspectRatio::Square);
    let mut el = shape("#00ff00", 0.0, 0.0, 100.0, 100.0, 1);
    el.locked = true;
    scene.add_element(el).expect("add");
    let report = renderer().render(&scene).expect("render");
    assert!(near(rgb_at(&report.surface, 50, 50), (0, 255, 0)));
}

#[test]
fn test_large_radius_draws_ellipse() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("#000000");
    let mut el = shape("#ffffff", 100.0, 100.0, 400.0, 400.0, 1);
    el.style.border_radius = Some(9999.0);
    scene.add_element(el).expect("add");

    let report = renderer().render(&scene).expect("render");
    assert!(near(rgb_at(&report.surface, 300, 300), (255, 255, 255)));
    // the bounding box corner is outside the ellipse
    assert!(near(rgb_at(&report.surface, 110, 110), (0, 0, 0)));
}

#[test]
fn test_element_opacity_blends_over_background() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("#000000");
    let mut el = shape("#ffffff", 0.0, 0.0, 200.0, 200.0, 1);
    el.style.opacity = Some(0.5);
    scene.add_element(el).expect("add");

    let report = renderer().render(&scene).expect("render");
    let (r, g, b, a) = rgb_at(&report.surface, 100, 100);
    assert_eq!(a, 255);
    for channel in [r, g, b] {
        assert!((120..=136).contains(&channel), "channel {channel}");
    }
}

#[test]
fn test_image_element_stretches_to_box() {
    let mut scene = Scene::new(AspectRatio::Square);
    let el = Element::new(ElementKind::Image { src: quadrant_png() }).with_transform(Transform {
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 200.0,
        ..Transform::default()
    });
    scene.add_element(el).expect("add");

    let report = renderer().render(&scene).expect("render");
    let s = &report.surface;
    assert!(near(rgb_at(s, 100, 50), (255, 0, 0)));
    assert!(near(rgb_at(s, 300, 150), (255, 255, 0)));
}

#[test]
fn test_zero_size_element_draws_nothing() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("#000000");
    scene
        .add_element(shape("#ffffff", 10.0, 10.0, 0.0, 50.0, 1))
        .expect("add");
    let report = renderer().render(&scene).expect("render");
    assert!(report.is_complete());
    assert!(near(rgb_at(&report.surface, 10, 20), (0, 0, 0)));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_broken_source_fails_only_its_layer() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("#000000");
    let broken = scene
        .add_element(
            Element::new(ElementKind::Image {
                src: "data:image/png;base64,bm90IGEgcG5n".to_string(),
            })
            .with_style(Style {
                z_index: 1,
                ..Style::default()
            }),
        )
        .expect("add");
    scene
        .add_element(shape("#ff0000", 500.0, 500.0, 100.0, 100.0, 2))
        .expect("add");

    let report = renderer().render(&scene).expect("render");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, Layer::Element(broken));
    assert!(near(rgb_at(&report.surface, 550, 550), (255, 0, 0)));
    assert!(near(rgb_at(&report.surface, 50, 50), (0, 0, 0)));
}

#[test]
fn test_unfetched_remote_background_is_reported() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::image("https://cdn.example.com/bg.png");
    let mut renderer = renderer();
    let report = renderer.render(&scene).expect("render");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].layer, Layer::Background);

    // once the bytes are supplied the same scene renders completely
    let bytes = adforge_renderer::image::decode_data_uri(&quadrant_png()).expect("uri");
    renderer
        .insert_source("https://cdn.example.com/bg.png", &bytes)
        .expect("insert");
    let report = renderer.render(&scene).expect("render");
    assert!(report.is_complete());
    assert!(near(rgb_at(&report.surface, 100, 100), (255, 0, 0)));
}

#[test]
fn test_unknown_color_token_is_reported() {
    let mut scene = Scene::new(AspectRatio::Square);
    scene.background = Background::color("not-a-color");
    let report = renderer().render(&scene).expect("render");
    assert_eq!(report.failures[0].layer, Layer::Background);
    assert_eq!(rgb_at(&report.surface, 0, 0).3, 0);
}

// ============================================================================
// Export Tests
// ============================================================================

#[test]
fn test_export_png_and_jpeg() {
    let mut scene = Scene::new(AspectRatio::Story);
    scene.background = Background::color("#336699");
    let mut renderer = renderer();

    let png = renderer.export(&scene, ExportFormat::Png).expect("png");
    assert_eq!(ImageFormat::from_magic_bytes(&png.bytes), ImageFormat::Png);
    assert!(png.data_uri().starts_with("data:image/png;base64,"));
    let decoded = decode_image(&png.bytes).expect("decode");
    assert_eq!((decoded.width(), decoded.height()), (608, 1080));

    let jpeg = renderer.export(&scene, ExportFormat::Jpeg).expect("jpeg");
    assert_eq!(ImageFormat::from_magic_bytes(&jpeg.bytes), ImageFormat::Jpeg);
    assert!(jpeg.data_uri().starts_with("data:image/jpeg;base64,"));
    assert!(jpeg.failures.is_empty());
}
