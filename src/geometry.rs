//! Pure 2D geometry helpers: area, containment, rotation, and Bezier flattening.
//!
//! Everything here works on plain [`Point`] slices so the renderer and the
//! quote panel can call it on whatever outline they hold.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use crate::camera::Point;

/// Shoelace area of a polygon, treated as implicitly closed.
///
/// Returns `0.0` for fewer than three points.
#[must_use]
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        twice += a.x * b.y - b.x * a.y;
    }
    twice.abs() / 2.0
}

/// Even-odd ray-casting containment test.
///
/// Returns `false` for fewer than three points.
#[must_use]
pub fn point_in_polygon(pt: Point, points: &[Point]) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > pt.y) != (b.y > pt.y) && pt.x < (b.x - a.x) * (pt.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of a point set. `None` when empty.
#[must_use]
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    let sum = points.iter().fold(Point::default(), |acc, p| acc + *p);
    Some(Point::new(sum.x / n, sum.y / n))
}

/// Rotate `pt` about `pivot` by `degrees` (clockwise in a y-down frame).
#[must_use]
pub fn rotate_point(pt: Point, pivot: Point, degrees: f64) -> Point {
    if degrees == 0.0 {
        return pt;
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = pt.x - pivot.x;
    let dy = pt.y - pivot.y;
    Point { x: pivot.x + dx * cos - dy * sin, y: pivot.y + dx * sin + dy * cos }
}

/// Total length of a polyline, optionally closing the last point to the first.
#[must_use]
pub fn polyline_length(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => open + last.distance(*first),
        _ => open,
    }
}

/// Shortest distance from `pt` to the segment `a`–`b`.
#[must_use]
pub fn distance_to_segment(pt: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return pt.distance(a);
    }
    let t = (((pt.x - a.x) * ab.x + (pt.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    pt.distance(a.lerp(b, t))
}

/// Evaluate a cubic Bezier at parameter `t` in `[0, 1]`.
#[must_use]
pub fn cubic_point(p0: Point, c1: Point, c2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point {
        x: a * p0.x + b * c1.x + c * c2.x + d * p3.x,
        y: a * p0.y + b * c1.y + c * c2.y + d * p3.y,
    }
}

/// Sample a cubic segment at `steps + 1` evenly spaced parameters, both ends included.
///
/// `steps` of zero is treated as one so the endpoints are always emitted.
#[must_use]
pub fn flatten_cubic(p0: Point, c1: Point, c2: Point, p3: Point, steps: usize) -> Vec<Point> {
    let steps = steps.max(1);
    #[allow(clippy::cast_precision_loss)]
    let n = steps as f64;
    (0..=steps)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let t = i as f64 / n;
            cubic_point(p0, c1, c2, p3, t)
        })
        .collect()
}
