use super::*;

use crate::foundation::core::Canvas;
use crate::viewport::controller::ViewportController;

fn viewport() -> ViewportController {
    ViewportController::new(
        Canvas {
            width: 1000,
            height: 500,
        },
        Vec2::new(2000.0, 1000.0),
    )
}

fn touch(id: u64, x: f64, y: f64) -> TouchPoint {
    TouchPoint {
        id,
        pos: Point::new(x, y),
    }
}

#[test]
fn pinch_scales_zoom_by_distance_ratio() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 900.0, 500.0), touch(2, 1100.0, 500.0)], 0.0, &mut vp);
    assert!(!vp.zoom_to_fit(), "pinch baseline leaves fit at gesture start");

    g.touch_move(&[touch(1, 800.0, 500.0), touch(2, 1200.0, 500.0)], 16.0, &mut vp);
    assert!((vp.transform().zoom - 1.8 * 2.0).abs() < 1e-9);
}

#[test]
fn pinch_keeps_scene_point_under_live_centroid() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();
    let container = vp.container();

    let start = [touch(1, 900.0, 500.0), touch(2, 1100.0, 500.0)];
    g.touch_start(&start, 0.0, &mut vp);
    let scene_at_centroid = vp
        .transform()
        .screen_to_css(Point::new(1000.0, 500.0), container);

    // The centroid itself moves to (1100, 600) while the fingers spread.
    let moved = [touch(1, 950.0, 600.0), touch(2, 1250.0, 600.0)];
    g.touch_move(&moved, 16.0, &mut vp);

    let now_under = vp
        .transform()
        .screen_to_css(Point::new(1100.0, 600.0), container);
    assert!((now_under.x - scene_at_centroid.x).abs() < 1e-9);
    assert!((now_under.y - scene_at_centroid.y).abs() < 1e-9);
}

#[test]
fn pinch_zoom_clamps() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();
    g.touch_start(&[touch(1, 999.0, 500.0), touch(2, 1001.0, 500.0)], 0.0, &mut vp);
    g.touch_move(&[touch(1, 0.0, 500.0), touch(2, 2000.0, 500.0)], 16.0, &mut vp);
    assert_eq!(vp.transform().zoom, 10.0);
}

#[test]
fn single_finger_pan_moves_viewport_by_deltas() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 500.0, 500.0)], 0.0, &mut vp);
    let base = vp.transform();
    g.touch_move(&[touch(1, 520.0, 490.0)], 16.0, &mut vp);
    g.touch_move(&[touch(1, 540.0, 485.0)], 32.0, &mut vp);

    let t = vp.transform();
    assert_eq!(t.x, base.x + 40.0);
    assert_eq!(t.y, base.y - 15.0);
}

#[test]
fn short_release_is_a_tap_not_momentum() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 500.0, 500.0)], 0.0, &mut vp);
    g.touch_move(&[touch(1, 502.0, 501.0)], 16.0, &mut vp);
    let release = g.touch_end(&[], 32.0, &mut vp);

    assert_eq!(release, TouchRelease::Tap(Point::new(502.0, 501.0)));
    assert!(!vp.has_momentum());
}

#[test]
fn pan_past_threshold_releases_into_momentum() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 500.0, 500.0)], 0.0, &mut vp);
    g.touch_move(&[touch(1, 530.0, 500.0)], 16.0, &mut vp);
    let release = g.touch_end(&[], 32.0, &mut vp);

    assert_eq!(release, TouchRelease::Momentum);
    assert!(vp.has_momentum());
    // First momentum frame continues at the last sampled velocity.
    let x0 = vp.transform().x;
    vp.tick();
    assert!((vp.transform().x - (x0 + 30.0)).abs() < 1e-9);
}

#[test]
fn velocity_normalizes_to_frame_cadence() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 500.0, 500.0)], 0.0, &mut vp);
    // 20 px in 8 ms is 40 px per 16 ms frame.
    g.touch_move(&[touch(1, 520.0, 500.0)], 8.0, &mut vp);
    g.touch_end(&[], 8.0, &mut vp);

    let x0 = vp.transform().x;
    vp.tick();
    assert!((vp.transform().x - (x0 + 40.0)).abs() < 1e-9);
}

#[test]
fn touch_start_cancels_running_momentum() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();
    vp.start_momentum(Vec2::new(30.0, 0.0));
    g.touch_start(&[touch(1, 0.0, 0.0)], 0.0, &mut vp);
    assert!(!vp.has_momentum());
}

#[test]
fn lifting_one_pinch_finger_rebaselines_to_pan() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();

    g.touch_start(&[touch(1, 900.0, 500.0), touch(2, 1100.0, 500.0)], 0.0, &mut vp);
    g.touch_move(&[touch(1, 800.0, 500.0), touch(2, 1200.0, 500.0)], 16.0, &mut vp);
    let after_pinch = vp.transform();

    let release = g.touch_end(&[touch(2, 1200.0, 500.0)], 32.0, &mut vp);
    assert_eq!(release, TouchRelease::Continuing);
    assert!(g.is_active());

    // The remaining finger pans from a fresh baseline, no jump.
    g.touch_move(&[touch(2, 1210.0, 500.0)], 48.0, &mut vp);
    assert!((vp.transform().x - (after_pinch.x + 10.0)).abs() < 1e-9);
    assert_eq!(vp.transform().zoom, after_pinch.zoom);
}

#[test]
fn release_with_no_gesture_is_inert() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();
    assert_eq!(g.touch_end(&[], 0.0, &mut vp), TouchRelease::Ended);
}

#[test]
fn two_finger_release_neither_taps_nor_coasts() {
    let mut vp = viewport();
    let mut g = TouchGestures::new();
    g.touch_start(&[touch(1, 900.0, 500.0), touch(2, 1100.0, 500.0)], 0.0, &mut vp);
    let release = g.touch_end(&[], 16.0, &mut vp);
    assert_eq!(release, TouchRelease::Ended);
    assert!(!vp.has_momentum());
}
