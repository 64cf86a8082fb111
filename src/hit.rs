#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Point;
use crate::doc::MaskStore;
use crate::geometry;
use crate::mask::{HandleSide, Mask, MaskId, MaskType, PointKind};

/// Which part of a mask was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    /// Inside an area mask, or on the stroke of a linear one.
    Body,
    /// A vertex, by index.
    Vertex(usize),
    /// A Bezier handle of a smooth vertex.
    Handle(usize, HandleSide),
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub mask_id: MaskId,
    pub part: HitPart,
}

/// Topmost visible mask whose body contains `pt` (image space).
///
/// Area masks use even-odd containment of their outline; linear masks match
/// within `radius` of any segment.
#[must_use]
pub fn hit_test(pt: Point, store: &MaskStore, radius: f64, steps: usize) -> Option<MaskId> {
    store
        .sorted_masks()
        .into_iter()
        .rev()
        .filter(|m| m.is_visible)
        .find(|m| body_contains(m, pt, radius, steps))
        .map(|m| m.id)
}

/// Hit-test a single mask, checking handles, then vertices, then the body.
#[must_use]
pub fn hit_mask(mask: &Mask, pt: Point, radius: f64, steps: usize) -> Option<Hit> {
    let part = pick_handle(mask, pt, radius)
        .map(|(i, side)| HitPart::Handle(i, side))
        .or_else(|| pick_point(mask, pt, radius).map(HitPart::Vertex))
        .or_else(|| body_contains(mask, pt, radius, steps).then_some(HitPart::Body))?;
    Some(Hit { mask_id: mask.id, part })
}

/// Index of the nearest vertex within `radius` of `pt`.
#[must_use]
pub fn pick_point(mask: &Mask, pt: Point, radius: f64) -> Option<usize> {
    mask.absolute_points()
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.pos().distance(pt)))
        .filter(|&(_, d)| d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Nearest smooth-vertex handle within `radius` of `pt`.
#[must_use]
pub fn pick_handle(mask: &Mask, pt: Point, radius: f64) -> Option<(usize, HandleSide)> {
    let mut best: Option<(usize, HandleSide, f64)> = None;
    for (i, p) in mask.absolute_points().iter().enumerate() {
        let PointKind::Smooth { h1, h2 } = p.kind else {
            continue;
        };
        for (side, h) in [(HandleSide::In, h1), (HandleSide::Out, h2)] {
            let d = h.distance(pt);
            if d <= radius && best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((i, side, d));
            }
        }
    }
    best.map(|(i, side, _)| (i, side))
}

fn body_contains(mask: &Mask, pt: Point, radius: f64, steps: usize) -> bool {
    let outline = mask.outline(steps);
    match mask.mask_type {
        MaskType::Area => geometry::point_in_polygon(pt, &outline),
        MaskType::Linear => outline.windows(2).any(|w| geometry::distance_to_segment(pt, w[0], w[1]) <= radius),
    }
}
