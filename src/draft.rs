//! Freehand drafting: the uncommitted polygon being placed point by point.
//!
//! States: `Idle` (no draft) → `Drafting` → back to `Idle`, either by
//! [`DraftBuilder::cancel`] or by [`DraftBuilder::finalize`] producing a
//! [`Mask`]. At most one draft exists; [`DraftBuilder::begin`] replaces any
//! unfinished one.

#[cfg(test)]
#[path = "draft_test.rs"]
mod draft_test;

use uuid::Uuid;

use crate::camera::{Point, ViewContext};
use crate::consts::{MIN_DRAFT_POINTS, MIN_SEGMENT_PX};
use crate::mask::{Mask, MaskPoint, MaskType};

/// The in-flight draft. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: Uuid,
    /// Image-space points in placement order.
    pub points: Vec<Point>,
    /// Type of mask the draft becomes on finalize.
    pub mode: MaskType,
}

/// Drafting state machine.
#[derive(Debug, Clone)]
pub struct DraftBuilder {
    draft: Option<Draft>,
    min_segment_px: f64,
}

impl Default for DraftBuilder {
    fn default() -> Self {
        Self::new(MIN_SEGMENT_PX)
    }
}

impl DraftBuilder {
    /// `min_segment_px` is the image-space jitter threshold for [`Self::append`].
    #[must_use]
    pub fn new(min_segment_px: f64) -> Self {
        Self { draft: None, min_segment_px }
    }

    /// Start a new, empty draft, discarding any unfinished one.
    pub fn begin(&mut self, mode: MaskType) -> &Draft {
        self.draft.insert(Draft { id: Uuid::new_v4(), points: Vec::new(), mode })
    }

    /// Map a client-pixel event into image space and append it.
    pub fn append(&mut self, client: Point, view: &ViewContext) -> bool {
        self.append_image(view.to_image(client))
    }

    /// Append an image-space point unless it lies within the jitter threshold
    /// of the previous one. Returns whether the point was kept.
    pub fn append_image(&mut self, pt: Point) -> bool {
        let Some(draft) = self.draft.as_mut() else {
            return false;
        };
        if let Some(last) = draft.points.last() {
            if last.distance(pt) <= self.min_segment_px {
                return false;
            }
        }
        draft.points.push(pt);
        true
    }

    /// Drop the last point. Keeps at least one.
    pub fn pop(&mut self) -> bool {
        match self.draft.as_mut() {
            Some(draft) if draft.points.len() > 1 => {
                draft.points.pop();
                true
            }
            _ => false,
        }
    }

    /// Discard the draft. Returns whether one existed.
    pub fn cancel(&mut self) -> bool {
        self.draft.take().is_some()
    }

    /// Whether a finalize call would succeed.
    #[must_use]
    pub fn can_finalize(&self) -> bool {
        self.draft.as_ref().is_some_and(|d| d.points.len() >= MIN_DRAFT_POINTS)
    }

    /// Turn the draft into a mask named `"{prefix} {order}"`.
    ///
    /// `order` is only called once the draft has enough points, so a rejected
    /// finalize never consumes a counter value. With too few points the draft
    /// is left as is and `None` is returned.
    pub fn finalize(&mut self, prefix: &str, order: impl FnOnce() -> u64, now: i64) -> Option<Mask> {
        if !self.can_finalize() {
            return None;
        }
        let draft = self.draft.take()?;
        let order = order();
        let points = draft.points.into_iter().map(MaskPoint::from).collect();
        Some(Mask::new(format!("{prefix} {order}"), draft.mode, points, order, now))
    }

    /// The current draft, if drafting.
    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    #[must_use]
    pub fn is_drafting(&self) -> bool {
        self.draft.is_some()
    }
}
