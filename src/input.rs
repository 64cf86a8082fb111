//! Interaction model: the active editing mode and the drag state machine.
//!
//! Point editing, move and rotate are mutually exclusive modes, each bound to
//! one target mask. Move and rotate carry a [`DragSession`] that tracks the
//! gesture between pointer-down and pointer-up. Every drag event names the
//! mask it is meant for; a session only reacts when that id matches its
//! target, so late events from another gesture (or from a mask deleted
//! mid-drag) cannot leak into this one.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::ops::{Add, Sub};

use crate::camera::Point;
use crate::mask::MaskId;

/// Phase of a drag within an entered mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase<T> {
    /// Mode entered, waiting for a pointer-down.
    Armed,
    /// Pointer is down.
    Dragging {
        /// Pointer value at pointer-down, used to derive deltas.
        start: T,
        /// Mask value (offset or angle) at pointer-down.
        baseline: T,
    },
}

/// Drag state for one target mask: `Armed` ⇄ `Dragging`.
///
/// Absence of a session is the idle state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession<T> {
    target: MaskId,
    phase: DragPhase<T>,
}

impl<T> DragSession<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T>,
{
    /// Arm a session for `target`.
    #[must_use]
    pub fn arm(target: MaskId) -> Self {
        Self { target, phase: DragPhase::Armed }
    }

    #[must_use]
    pub fn target(&self) -> MaskId {
        self.target
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase<T> {
        self.phase
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Whether an event for `id` may touch this session's drag.
    #[must_use]
    pub fn accepts(&self, id: &MaskId) -> bool {
        self.target == *id && self.is_dragging()
    }

    /// `Armed` → `Dragging`. Rejected for another mask or when already dragging.
    pub fn start(&mut self, id: &MaskId, start: T, baseline: T) -> bool {
        if self.target != *id || self.is_dragging() {
            return false;
        }
        self.phase = DragPhase::Dragging { start, baseline };
        true
    }

    /// New mask value for a pointer `delta`, or `None` if the event is stale.
    #[must_use]
    pub fn value_for_delta(&self, id: &MaskId, delta: T) -> Option<T> {
        match self.phase {
            DragPhase::Dragging { baseline, .. } if self.target == *id => Some(baseline + delta),
            _ => None,
        }
    }

    /// Delta from the pointer-down value to `current`, or `None` if not dragging `id`.
    #[must_use]
    pub fn delta_to(&self, id: &MaskId, current: T) -> Option<T> {
        match self.phase {
            DragPhase::Dragging { start, .. } if self.target == *id => Some(current - start),
            _ => None,
        }
    }

    /// `Dragging` → `Armed`, keeping the current value.
    pub fn end(&mut self, id: &MaskId) -> bool {
        if !self.accepts(id) {
            return false;
        }
        self.phase = DragPhase::Armed;
        true
    }

    /// `Dragging` → `Armed`, returning the baseline so the caller can restore it.
    pub fn cancel(&mut self, id: &MaskId) -> Option<T> {
        let DragPhase::Dragging { baseline, .. } = self.phase else {
            return None;
        };
        if self.target != *id {
            return None;
        }
        self.phase = DragPhase::Armed;
        Some(baseline)
    }
}

/// Discriminant of [`InteractionMode`], for hosts that only need to know which mode is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Idle,
    Drafting,
    PointEdit,
    Move,
    Rotate,
}

/// The active editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionMode {
    /// No mode entered.
    #[default]
    Idle,
    /// Vertex editing on a flattened mask.
    PointEdit {
        target: MaskId,
        /// Translation the mask had before it was flattened on entry.
        original_position: Point,
        /// Rotation the mask had before it was flattened on entry.
        original_rotation: f64,
    },
    /// Translating a mask by dragging.
    Move(DragSession<Point>),
    /// Rotating a mask about its centroid by dragging.
    Rotate(DragSession<f64>),
}

impl InteractionMode {
    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::Idle => ModeKind::Idle,
            Self::PointEdit { .. } => ModeKind::PointEdit,
            Self::Move(_) => ModeKind::Move,
            Self::Rotate(_) => ModeKind::Rotate,
        }
    }

    /// The mask this mode is bound to, if any.
    #[must_use]
    pub fn target(&self) -> Option<MaskId> {
        match self {
            Self::Idle => None,
            Self::PointEdit { target, .. } => Some(*target),
            Self::Move(session) => Some(session.target()),
            Self::Rotate(session) => Some(session.target()),
        }
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        match self {
            Self::Move(session) => session.is_dragging(),
            Self::Rotate(session) => session.is_dragging(),
            Self::Idle | Self::PointEdit { .. } => false,
        }
    }

    /// Whether point edits on `id` are currently allowed by the mode.
    #[must_use]
    pub fn is_point_editing(&self, id: &MaskId) -> bool {
        matches!(self, Self::PointEdit { target, .. } if target == id)
    }
}
