use super::*;
use crate::camera::{Camera, ImageFit, Viewport};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn builder_with(points: &[(f64, f64)]) -> DraftBuilder {
    let mut b = DraftBuilder::default();
    b.begin(MaskType::Area);
    for &(x, y) in points {
        b.append_image(pt(x, y));
    }
    b
}

// =============================================================
// begin / cancel
// =============================================================

#[test]
fn new_builder_is_idle() {
    let b = DraftBuilder::default();
    assert!(!b.is_drafting());
    assert!(b.draft().is_none());
}

#[test]
fn begin_creates_empty_draft() {
    let mut b = DraftBuilder::default();
    let draft = b.begin(MaskType::Linear);
    assert!(draft.points.is_empty());
    assert_eq!(draft.mode, MaskType::Linear);
    assert!(b.is_drafting());
}

#[test]
fn begin_overwrites_unfinished_draft() {
    let mut b = builder_with(&[(0.0, 0.0), (10.0, 0.0)]);
    let old_id = b.draft().unwrap().id;
    b.begin(MaskType::Area);
    let draft = b.draft().unwrap();
    assert_ne!(draft.id, old_id);
    assert!(draft.points.is_empty());
}

#[test]
fn cancel_discards_draft() {
    let mut b = builder_with(&[(0.0, 0.0)]);
    assert!(b.cancel());
    assert!(!b.is_drafting());
    assert!(!b.cancel());
}

// =============================================================
// append
// =============================================================

#[test]
fn append_without_draft_is_noop() {
    let mut b = DraftBuilder::default();
    assert!(!b.append_image(pt(1.0, 1.0)));
}

#[test]
fn append_rejects_jitter_within_threshold() {
    let mut b = builder_with(&[(0.0, 0.0)]);
    assert!(!b.append_image(pt(1.0, 1.0)));
    assert!(!b.append_image(pt(1.5, 0.0)));
    assert!(b.append_image(pt(1.6, 0.0)));
    assert_eq!(b.draft().unwrap().points.len(), 2);
}

#[test]
fn append_threshold_is_relative_to_last_point() {
    let mut b = builder_with(&[(0.0, 0.0), (10.0, 0.0)]);
    assert!(b.append_image(pt(0.5, 0.0)));
}

#[test]
fn append_maps_through_view() {
    let view = ViewContext {
        viewport: Viewport { left: 10.0, top: 20.0, width: 100.0, height: 100.0 },
        camera: Camera { scale: 2.0, pan_x: 0.0, pan_y: 0.0 },
        dpr: 1.0,
        fit: ImageFit::default(),
    };
    let mut b = DraftBuilder::default();
    b.begin(MaskType::Area);
    assert!(b.append(pt(30.0, 40.0), &view));
    assert_eq!(b.draft().unwrap().points[0], pt(10.0, 10.0));
}

#[test]
fn custom_threshold() {
    let mut b = DraftBuilder::new(5.0);
    b.begin(MaskType::Area);
    b.append_image(pt(0.0, 0.0));
    assert!(!b.append_image(pt(4.0, 0.0)));
    assert!(b.append_image(pt(6.0, 0.0)));
}

// =============================================================
// pop
// =============================================================

#[test]
fn pop_removes_last_point() {
    let mut b = builder_with(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
    assert!(b.pop());
    assert_eq!(b.draft().unwrap().points, vec![pt(0.0, 0.0), pt(10.0, 0.0)]);
}

#[test]
fn pop_keeps_single_point() {
    let mut b = builder_with(&[(0.0, 0.0)]);
    assert!(!b.pop());
    assert_eq!(b.draft().unwrap().points.len(), 1);
}

#[test]
fn pop_without_draft_is_noop() {
    let mut b = DraftBuilder::default();
    assert!(!b.pop());
}

// =============================================================
// finalize
// =============================================================

#[test]
fn finalize_with_two_points_keeps_draft() {
    let mut b = builder_with(&[(0.0, 0.0), (10.0, 0.0)]);
    let before = b.draft().cloned();
    let mut called = false;
    let mask = b.finalize("Mask", || {
        called = true;
        1
    }, 0);
    assert!(mask.is_none());
    assert!(!called);
    assert_eq!(b.draft().cloned(), before);
}

#[test]
fn finalize_with_three_points_produces_mask() {
    let mut b = builder_with(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    let mask = b.finalize("Mask", || 7, 123).unwrap();
    assert_eq!(mask.points.len(), 3);
    assert_eq!(mask.name, "Mask 7");
    assert_eq!(mask.order, 7);
    assert_eq!(mask.mask_type, MaskType::Area);
    assert!(mask.is_flat());
    assert_eq!(mask.created_at, 123);
    assert!(!b.is_drafting());
}

#[test]
fn finalize_keeps_point_positions() {
    let mut b = builder_with(&[(1.0, 2.0), (30.0, 4.0), (5.0, 60.0)]);
    let mask = b.finalize("Region", || 1, 0).unwrap();
    assert_eq!(mask.vertices(), vec![pt(1.0, 2.0), pt(30.0, 4.0), pt(5.0, 60.0)]);
}

#[test]
fn finalize_without_draft_is_none() {
    let mut b = DraftBuilder::default();
    assert!(b.finalize("Mask", || 1, 0).is_none());
}
