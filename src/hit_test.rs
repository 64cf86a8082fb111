use super::*;
use crate::mask::MaskPoint;

fn square_at(x: f64, y: f64, size: f64, order: u64) -> Mask {
    let points = vec![
        MaskPoint::corner(x, y),
        MaskPoint::corner(x + size, y),
        MaskPoint::corner(x + size, y + size),
        MaskPoint::corner(x, y + size),
    ];
    Mask::new(format!("Mask {order}"), MaskType::Area, points, order, 0)
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn hit_test_empty_store() {
    assert!(hit_test(pt(0.0, 0.0), &MaskStore::new(), 4.0, 10).is_none());
}

#[test]
fn hit_test_inside_area_mask() {
    let mut store = MaskStore::new();
    let m = square_at(0.0, 0.0, 100.0, 1);
    let id = m.id;
    store.insert(m);
    assert_eq!(hit_test(pt(50.0, 50.0), &store, 4.0, 10), Some(id));
    assert_eq!(hit_test(pt(150.0, 50.0), &store, 4.0, 10), None);
}

#[test]
fn hit_test_prefers_topmost() {
    let mut store = MaskStore::new();
    let below = square_at(0.0, 0.0, 100.0, 1);
    let above = square_at(50.0, 50.0, 100.0, 2);
    let (below_id, above_id) = (below.id, above.id);
    store.insert(below);
    store.insert(above);
    assert_eq!(hit_test(pt(75.0, 75.0), &store, 4.0, 10), Some(above_id));
    assert_eq!(hit_test(pt(25.0, 25.0), &store, 4.0, 10), Some(below_id));
}

#[test]
fn hit_test_skips_hidden() {
    let mut store = MaskStore::new();
    let mut m = square_at(0.0, 0.0, 100.0, 1);
    m.is_visible = false;
    store.insert(m);
    assert!(hit_test(pt(50.0, 50.0), &store, 4.0, 10).is_none());
}

#[test]
fn hit_test_respects_transform() {
    let mut store = MaskStore::new();
    let mut m = square_at(0.0, 0.0, 10.0, 1);
    m.position = pt(100.0, 0.0);
    let id = m.id;
    store.insert(m);
    assert!(hit_test(pt(5.0, 5.0), &store, 1.0, 10).is_none());
    assert_eq!(hit_test(pt(105.0, 5.0), &store, 1.0, 10), Some(id));
}

#[test]
fn hit_test_linear_uses_radius() {
    let mut store = MaskStore::new();
    let m = Mask::new(
        "Line".into(),
        MaskType::Linear,
        vec![MaskPoint::corner(0.0, 0.0), MaskPoint::corner(100.0, 0.0)],
        1,
        0,
    );
    let id = m.id;
    store.insert(m);
    assert_eq!(hit_test(pt(50.0, 3.0), &store, 4.0, 10), Some(id));
    assert!(hit_test(pt(50.0, 6.0), &store, 4.0, 10).is_none());
}

// =============================================================
// pick_point / pick_handle / hit_mask
// =============================================================

#[test]
fn pick_point_nearest_within_radius() {
    let m = square_at(0.0, 0.0, 10.0, 1);
    assert_eq!(pick_point(&m, pt(9.0, 1.0), 3.0), Some(1));
    assert_eq!(pick_point(&m, pt(5.0, 5.0), 3.0), None);
}

#[test]
fn pick_handle_finds_smooth_handles() {
    let mut m = square_at(0.0, 0.0, 10.0, 1);
    m.toggle_point_curve(1, 0.2, 0);
    // h1 toward (0,0) at (8,0); h2 toward (10,10) at (10,2)
    assert_eq!(pick_handle(&m, pt(8.0, 0.5), 1.0), Some((1, HandleSide::In)));
    assert_eq!(pick_handle(&m, pt(10.0, 2.5), 1.0), Some((1, HandleSide::Out)));
    assert_eq!(pick_handle(&m, pt(5.0, 5.0), 1.0), None);
}

#[test]
fn hit_mask_prioritises_handle_then_vertex_then_body() {
    let mut m = square_at(0.0, 0.0, 100.0, 1);
    m.toggle_point_curve(1, 0.2, 0);
    let id = m.id;
    assert_eq!(hit_mask(&m, pt(80.0, 0.0), 2.0, 10), Some(Hit { mask_id: id, part: HitPart::Handle(1, HandleSide::In) }));
    assert_eq!(hit_mask(&m, pt(0.0, 100.0), 2.0, 10), Some(Hit { mask_id: id, part: HitPart::Vertex(3) }));
    assert_eq!(hit_mask(&m, pt(50.0, 50.0), 2.0, 10), Some(Hit { mask_id: id, part: HitPart::Body }));
    assert_eq!(hit_mask(&m, pt(500.0, 50.0), 2.0, 10), None);
}
