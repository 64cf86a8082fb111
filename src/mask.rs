//! Mask model: polygon and polyline regions drawn over the source photo.
//!
//! A [`Mask`] stores its vertices in image-space pixels together with a
//! translation (`position`) and a `rotation` about the vertex centroid. The
//! absolute location of a vertex is `rotate(p, centroid, rotation) + position`.
//! [`Mask::flatten`] folds that transform into the vertices and resets it.
//!
//! Curvature lives on the vertices themselves: a [`PointKind::Smooth`] vertex
//! carries both Bezier handles, a [`PointKind::Corner`] carries none, so a
//! half-specified curve cannot be represented.
//!
//! Every mutating method returns `false` and leaves the mask untouched when it
//! is locked or the arguments are out of range. Callers that need feedback
//! check the return value; nothing here panics or returns an error.

#[cfg(test)]
#[path = "mask_test.rs"]
mod mask_test;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Point;
use crate::consts::{MIN_AREA_POINTS, MIN_LINEAR_POINTS};
use crate::geometry;

/// Unique identifier for a mask.
pub type MaskId = Uuid;

/// Milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

/// Whether the mask is a closed region or an open polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    /// Closed polygon; the last vertex implicitly connects to the first.
    #[default]
    Area,
    /// Open polyline, measured by length rather than area.
    Linear,
}

impl MaskType {
    /// Fewest vertices a mask of this type may have.
    #[must_use]
    pub fn min_points(self) -> usize {
        match self {
            Self::Area => MIN_AREA_POINTS,
            Self::Linear => MIN_LINEAR_POINTS,
        }
    }

    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Area)
    }
}

/// Vertex curvature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointKind {
    /// Sharp vertex; adjacent segments are straight at this end.
    Corner,
    /// Curved vertex. `h1` is the incoming handle (toward the previous vertex),
    /// `h2` the outgoing one (toward the next). Both are image-space positions.
    Smooth { h1: Point, h2: Point },
}

/// Which handle of a smooth vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleSide {
    /// Incoming handle, `h1`.
    In,
    /// Outgoing handle, `h2`.
    Out,
}

/// A single mask vertex in image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskPoint {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub kind: PointKind,
}

impl MaskPoint {
    #[must_use]
    pub fn corner(x: f64, y: f64) -> Self {
        Self { x, y, kind: PointKind::Corner }
    }

    #[must_use]
    pub fn smooth(x: f64, y: f64, h1: Point, h2: Point) -> Self {
        Self { x, y, kind: PointKind::Smooth { h1, h2 } }
    }

    #[must_use]
    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[must_use]
    pub fn is_smooth(&self) -> bool {
        matches!(self.kind, PointKind::Smooth { .. })
    }

    /// Control point used when a segment arrives at this vertex.
    #[must_use]
    pub fn in_control(&self) -> Point {
        match self.kind {
            PointKind::Corner => self.pos(),
            PointKind::Smooth { h1, .. } => h1,
        }
    }

    /// Control point used when a segment leaves this vertex.
    #[must_use]
    pub fn out_control(&self) -> Point {
        match self.kind {
            PointKind::Corner => self.pos(),
            PointKind::Smooth { h2, .. } => h2,
        }
    }

    /// Apply `f` to the vertex and to both handles.
    #[must_use]
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        let p = f(self.pos());
        let kind = match self.kind {
            PointKind::Corner => PointKind::Corner,
            PointKind::Smooth { h1, h2 } => PointKind::Smooth { h1: f(h1), h2: f(h2) },
        };
        Self { x: p.x, y: p.y, kind }
    }
}

impl From<Point> for MaskPoint {
    fn from(p: Point) -> Self {
        Self::corner(p.x, p.y)
    }
}

/// A user-authored region over the source image.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    pub id: MaskId,
    pub name: String,
    #[serde(rename = "type")]
    pub mask_type: MaskType,
    pub points: Vec<MaskPoint>,
    /// Global translation applied after rotation.
    pub position: Point,
    /// Degrees about the vertex centroid. Not normalized.
    pub rotation: f64,
    pub is_locked: bool,
    pub is_visible: bool,
    /// Draw order; lower values are drawn beneath higher values.
    pub z_index: i64,
    /// Creation sequence number from the store's counter.
    pub order: u64,
    /// Assigned material, if any.
    pub material_id: Option<String>,
    pub created_at: i64,
    pub last_modified: i64,
}

impl Mask {
    /// Build an unlocked, visible mask with an identity transform.
    #[must_use]
    pub fn new(name: String, mask_type: MaskType, points: Vec<MaskPoint>, order: u64, now: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            mask_type,
            points,
            position: Point::default(),
            rotation: 0.0,
            is_locked: false,
            is_visible: true,
            z_index: i64::try_from(order).unwrap_or(i64::MAX),
            order,
            material_id: None,
            created_at: now,
            last_modified: now,
        }
    }

    /// Whether the vertex count satisfies the type's minimum.
    #[must_use]
    pub fn has_valid_point_count(&self) -> bool {
        self.points.len() >= self.mask_type.min_points()
    }

    // --- Derived geometry ---

    /// Raw vertex positions, before the mask transform.
    #[must_use]
    pub fn vertices(&self) -> Vec<Point> {
        self.points.iter().map(MaskPoint::pos).collect()
    }

    /// Rotation pivot: mean of the raw vertices.
    #[must_use]
    pub fn centroid(&self) -> Point {
        geometry::centroid(&self.vertices()).unwrap_or_default()
    }

    /// Whether `position` and `rotation` are both identity.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.position == Point::default() && self.rotation == 0.0
    }

    /// Vertices with rotation then translation applied.
    #[must_use]
    pub fn absolute_points(&self) -> Vec<MaskPoint> {
        let pivot = self.centroid();
        let (rotation, position) = (self.rotation, self.position);
        self.points
            .iter()
            .map(|p| p.map(|q| geometry::rotate_point(q, pivot, rotation) + position))
            .collect()
    }

    /// Absolute outline with curved segments sampled at `steps` per segment.
    ///
    /// Closed masks do not repeat the first vertex at the end.
    #[must_use]
    pub fn outline(&self, steps: usize) -> Vec<Point> {
        let pts = self.absolute_points();
        let n = pts.len();
        if n < 2 {
            return pts.iter().map(MaskPoint::pos).collect();
        }
        let segments = if self.mask_type.is_closed() { n } else { n - 1 };
        let mut out = Vec::with_capacity(n);
        for i in 0..segments {
            let a = pts[i];
            let b = pts[(i + 1) % n];
            if a.is_smooth() || b.is_smooth() {
                let samples = geometry::flatten_cubic(a.pos(), a.out_control(), b.in_control(), b.pos(), steps);
                out.extend_from_slice(&samples[..samples.len() - 1]);
            } else {
                out.push(a.pos());
            }
        }
        if !self.mask_type.is_closed() {
            out.push(pts[n - 1].pos());
        }
        out
    }

    /// Enclosed pixel area of the outline. Zero for linear masks.
    #[must_use]
    pub fn area_px(&self, steps: usize) -> f64 {
        match self.mask_type {
            MaskType::Area => geometry::polygon_area(&self.outline(steps)),
            MaskType::Linear => 0.0,
        }
    }

    /// Pixel length of the outline; the perimeter for area masks.
    #[must_use]
    pub fn length_px(&self, steps: usize) -> f64 {
        geometry::polyline_length(&self.outline(steps), self.mask_type.is_closed())
    }

    fn neighbours(&self, index: usize) -> (Point, Point) {
        let n = self.points.len();
        let here = self.points[index].pos();
        let closed = self.mask_type.is_closed();
        let prev = match index {
            0 if closed => self.points[n - 1].pos(),
            0 => here,
            i => self.points[i - 1].pos(),
        };
        let next = match index + 1 {
            j if j < n => self.points[j].pos(),
            _ if closed => self.points[0].pos(),
            _ => here,
        };
        (prev, next)
    }

    // --- Mutations ---

    /// Stamp `last_modified`.
    pub fn touch(&mut self, now: i64) {
        self.last_modified = now;
    }

    /// Fold the transform into the vertices and handles, resetting it to identity.
    ///
    /// Absolute geometry is unchanged. Returns `false` when locked.
    pub fn flatten(&mut self) -> bool {
        if self.is_locked {
            return false;
        }
        if self.is_flat() {
            return true;
        }
        self.points = self.absolute_points();
        self.position = Point::default();
        self.rotation = 0.0;
        true
    }

    /// Move vertex `index` to `to`, carrying its handles along.
    pub fn update_point(&mut self, index: usize, to: Point, now: i64) -> bool {
        if self.is_locked || index >= self.points.len() {
            return false;
        }
        let delta = to - self.points[index].pos();
        self.points[index] = self.points[index].map(|p| p + delta);
        self.touch(now);
        true
    }

    /// Insert a corner vertex so that it lands at position `index` (`0..=len`).
    pub fn add_point(&mut self, index: usize, at: Point, now: i64) -> bool {
        if self.is_locked || index > self.points.len() {
            return false;
        }
        self.points.insert(index, MaskPoint::from(at));
        self.touch(now);
        true
    }

    /// Remove vertex `index` unless that would drop below the type's minimum.
    pub fn remove_point(&mut self, index: usize, now: i64) -> bool {
        if self.is_locked || index >= self.points.len() || self.points.len() <= self.mask_type.min_points() {
            return false;
        }
        self.points.remove(index);
        self.touch(now);
        true
    }

    /// Switch vertex `index` between corner and smooth.
    ///
    /// A new smooth vertex gets `h1` at `ratio` of the way to the previous
    /// vertex and `h2` at `ratio` of the way to the next.
    pub fn toggle_point_curve(&mut self, index: usize, ratio: f64, now: i64) -> bool {
        if self.is_locked || index >= self.points.len() {
            return false;
        }
        let point = self.points[index];
        self.points[index].kind = match point.kind {
            PointKind::Smooth { .. } => PointKind::Corner,
            PointKind::Corner => {
                let (prev, next) = self.neighbours(index);
                PointKind::Smooth { h1: point.pos().lerp(prev, ratio), h2: point.pos().lerp(next, ratio) }
            }
        };
        self.touch(now);
        true
    }

    /// Move one handle of a smooth vertex. Corner vertices are rejected.
    pub fn update_bezier_handle(&mut self, index: usize, side: HandleSide, to: Point, now: i64) -> bool {
        if self.is_locked {
            return false;
        }
        let Some(PointKind::Smooth { h1, h2 }) = self.points.get_mut(index).map(|p| &mut p.kind) else {
            return false;
        };
        match side {
            HandleSide::In => *h1 = to,
            HandleSide::Out => *h2 = to,
        }
        self.touch(now);
        true
    }

    /// Set the translation offset. Does not stamp `last_modified`.
    pub fn set_position(&mut self, position: Point) -> bool {
        if self.is_locked {
            return false;
        }
        self.position = position;
        true
    }

    /// Set the rotation in degrees. Does not stamp `last_modified`.
    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        if self.is_locked {
            return false;
        }
        self.rotation = degrees;
        true
    }
}
