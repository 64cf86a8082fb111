#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn view(left: f64, top: f64, scale: f64, pan: (f64, f64), dpr: f64, fit: (f64, f64, f64)) -> ViewContext {
    ViewContext {
        viewport: Viewport { left, top, width: 800.0, height: 600.0 },
        camera: Camera { scale, pan_x: pan.0, pan_y: pan.1 },
        dpr,
        fit: ImageFit { origin_x: fit.0, origin_y: fit.1, scale: fit.2 },
    }
}

// --- Point ---

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_add_sub() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(10.0, 20.0);
    assert_eq!(a + b, Point::new(11.0, 22.0));
    assert_eq!(b - a, Point::new(9.0, 18.0));
}

#[test]
fn point_lerp() {
    let p = Point::new(5.0, 0.0).lerp(Point::new(10.0, 0.0), 0.2);
    assert!(point_approx_eq(p, Point::new(6.0, 0.0)));
}

// --- Camera ---

#[test]
fn camera_default_is_identity() {
    let cam = Camera::default();
    assert_eq!(cam.scale, 1.0);
    assert_eq!(cam.pan_x, 0.0);
    assert_eq!(cam.pan_y, 0.0);
}

#[test]
fn camera_screen_to_world_with_pan_and_scale() {
    let cam = Camera { scale: 2.0, pan_x: 20.0, pan_y: 10.0 };
    let world = cam.screen_to_world(Point::new(20.0, 10.0));
    assert!(point_approx_eq(world, Point::new(0.0, 0.0)));
}

#[test]
fn camera_world_to_screen_with_pan_and_scale() {
    let cam = Camera { scale: 3.0, pan_x: 20.0, pan_y: 10.0 };
    let screen = cam.world_to_screen(Point::new(5.0, 5.0));
    assert!(point_approx_eq(screen, Point::new(35.0, 25.0)));
}

#[test]
fn camera_screen_dist_ignores_pan() {
    let cam = Camera { scale: 4.0, pan_x: 999.0, pan_y: -999.0 };
    assert!(approx_eq(cam.screen_dist_to_world(8.0), 2.0));
}

// --- screen_to_image ---

#[test]
fn screen_to_image_identity() {
    let v = ViewContext::default();
    assert!(point_approx_eq(v.to_image(Point::new(50.0, 75.0)), Point::new(50.0, 75.0)));
}

#[test]
fn screen_to_image_subtracts_viewport_origin() {
    let v = view(100.0, 40.0, 1.0, (0.0, 0.0), 1.0, (0.0, 0.0, 1.0));
    assert!(point_approx_eq(v.to_image(Point::new(100.0, 40.0)), Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_image_applies_dpr_before_pan() {
    // (10 - 0) * 2 = 20 device px, minus pan 20 = 0.
    let v = view(0.0, 0.0, 1.0, (20.0, 20.0), 2.0, (0.0, 0.0, 1.0));
    assert!(point_approx_eq(v.to_image(Point::new(10.0, 10.0)), Point::new(0.0, 0.0)));
}

#[test]
fn screen_to_image_full_pipeline() {
    // client 60 -> -10 viewport -> *2 dpr = 100 -> -20 pan = 80 -> /4 scale = 20
    // -> -4 origin = 16 -> /0.5 fit = 32
    let v = view(10.0, 10.0, 4.0, (20.0, 20.0), 2.0, (4.0, 4.0, 0.5));
    let img = v.to_image(Point::new(60.0, 60.0));
    assert!(point_approx_eq(img, Point::new(32.0, 32.0)));
}

#[test]
fn image_to_screen_full_pipeline() {
    let v = view(10.0, 10.0, 4.0, (20.0, 20.0), 2.0, (4.0, 4.0, 0.5));
    let screen = v.to_screen(Point::new(32.0, 32.0));
    assert!(point_approx_eq(screen, Point::new(60.0, 60.0)));
}

#[test]
fn free_functions_match_view_context() {
    let v = view(3.0, 7.0, 1.5, (-12.0, 30.0), 1.25, (8.0, -2.0, 0.75));
    let p = Point::new(123.0, 456.0);
    let a = screen_to_image(p, &v.viewport, &v.camera, v.dpr, &v.fit);
    assert_eq!(a, v.to_image(p));
    let b = image_to_screen(a, &v.viewport, &v.camera, v.dpr, &v.fit);
    assert_eq!(b, v.to_screen(a));
}

// --- Round trips ---

#[test]
fn round_trip_within_one_pixel_across_grid() {
    let dprs = [1.0, 1.5, 2.0, 3.0];
    let scales = [0.1, 0.5, 1.0, 2.5, 10.0];
    let pans = [(-300.0, 125.5), (0.5, -0.25), (1024.0, 768.0)];
    let fits = [(12.0, -30.0, 0.37), (-200.0, 55.5, 1.0), (0.0, 10.0, 2.4)];
    let samples = [Point::new(0.0, 0.0), Point::new(17.3, 911.1), Point::new(1919.0, 1079.0)];

    for &dpr in &dprs {
        for &scale in &scales {
            for &pan in &pans {
                for &fit in &fits {
                    let v = view(37.0, 88.0, scale, pan, dpr, fit);
                    for &p in &samples {
                        let back = v.to_screen(v.to_image(p));
                        assert!(back.distance(p) < 1.0, "round trip drifted: {p:?} -> {back:?} with {v:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn round_trip_image_first() {
    let v = view(5.0, 5.0, 0.75, (13.7, -42.3), 2.0, (100.0, 50.0, 0.6));
    let image = Point::new(333.3, -999.9);
    let back = v.to_image(v.to_screen(image));
    assert!(back.distance(image) < 1e-6);
}

// --- screen_dist_to_image ---

#[test]
fn screen_dist_to_image_accounts_for_every_scale() {
    let v = view(0.0, 0.0, 2.0, (5.0, 5.0), 2.0, (0.0, 0.0, 0.5));
    // 8 client px * 2 dpr = 16 device / 2 camera = 8 world / 0.5 fit = 16 image.
    assert!(approx_eq(v.screen_dist_to_image(8.0), 16.0));
}
