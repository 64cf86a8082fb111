#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

// =============================================================
// DragSession
// =============================================================

#[test]
fn armed_session_is_not_dragging() {
    let id = Uuid::new_v4();
    let s = DragSession::<f64>::arm(id);
    assert_eq!(s.target(), id);
    assert_eq!(s.phase(), DragPhase::Armed);
    assert!(!s.is_dragging());
    assert!(!s.accepts(&id));
}

#[test]
fn start_moves_to_dragging() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    assert!(s.start(&id, 10.0, 30.0));
    assert!(s.is_dragging());
    assert!(s.accepts(&id));
    assert_eq!(s.phase(), DragPhase::Dragging { start: 10.0, baseline: 30.0 });
}

#[test]
fn start_for_other_mask_is_rejected() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    assert!(!s.start(&Uuid::new_v4(), 0.0, 0.0));
    assert!(!s.is_dragging());
}

#[test]
fn start_twice_is_rejected() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 0.0, 5.0);
    assert!(!s.start(&id, 1.0, 9.0));
    assert_eq!(s.phase(), DragPhase::Dragging { start: 0.0, baseline: 5.0 });
}

#[test]
fn value_is_baseline_plus_delta() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, Point::new(100.0, 100.0), Point::new(5.0, 5.0));
    assert_eq!(s.value_for_delta(&id, Point::new(3.0, -2.0)), Some(Point::new(8.0, 3.0)));
}

#[test]
fn value_for_stale_id_is_none() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 0.0, 0.0);
    assert_eq!(s.value_for_delta(&Uuid::new_v4(), 5.0), None);
}

#[test]
fn value_while_armed_is_none() {
    let id = Uuid::new_v4();
    let s = DragSession::arm(id);
    assert_eq!(s.value_for_delta(&id, 5.0), None);
}

#[test]
fn delta_to_uses_start_value() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 40.0, 0.0);
    assert_eq!(s.delta_to(&id, 55.0), Some(15.0));
    assert_eq!(s.delta_to(&Uuid::new_v4(), 55.0), None);
}

#[test]
fn end_returns_to_armed() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 0.0, 0.0);
    assert!(s.end(&id));
    assert_eq!(s.phase(), DragPhase::Armed);
    assert!(!s.end(&id));
}

#[test]
fn end_for_other_mask_is_rejected() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 0.0, 0.0);
    assert!(!s.end(&Uuid::new_v4()));
    assert!(s.is_dragging());
}

#[test]
fn cancel_returns_baseline() {
    let id = Uuid::new_v4();
    let mut s = DragSession::arm(id);
    s.start(&id, 0.0, 12.5);
    assert_eq!(s.cancel(&Uuid::new_v4()), None);
    assert_eq!(s.cancel(&id), Some(12.5));
    assert!(!s.is_dragging());
    assert_eq!(s.cancel(&id), None);
}

// =============================================================
// InteractionMode
// =============================================================

#[test]
fn mode_default_is_idle() {
    let m = InteractionMode::default();
    assert_eq!(m.kind(), ModeKind::Idle);
    assert!(m.target().is_none());
    assert!(!m.is_dragging());
}

#[test]
fn mode_target_and_kind() {
    let id = Uuid::new_v4();
    let edit = InteractionMode::PointEdit { target: id, original_position: Point::default(), original_rotation: 0.0 };
    assert_eq!(edit.kind(), ModeKind::PointEdit);
    assert_eq!(edit.target(), Some(id));
    assert!(edit.is_point_editing(&id));
    assert!(!edit.is_point_editing(&Uuid::new_v4()));

    let mv = InteractionMode::Move(DragSession::arm(id));
    assert_eq!(mv.kind(), ModeKind::Move);
    assert_eq!(mv.target(), Some(id));
    assert!(!mv.is_point_editing(&id));

    let rot = InteractionMode::Rotate(DragSession::arm(id));
    assert_eq!(rot.kind(), ModeKind::Rotate);
}

#[test]
fn mode_is_dragging_follows_session() {
    let id = Uuid::new_v4();
    let mut session = DragSession::arm(id);
    session.start(&id, 0.0, 0.0);
    assert!(InteractionMode::Rotate(session).is_dragging());
}
