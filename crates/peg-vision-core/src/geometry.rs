//! Planar contour geometry: convex hulls, polygon approximation, areas.
//!
//! All operations work on integer pixel coordinates, the representation
//! produced by border-following contour extraction. Coordinates are widened
//! before any subtraction and products are accumulated in `i128`, so every
//! `i32` point is valid input.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Ordered sequence of integer points: a contour, a hull or a polygon.
pub type PointSequence = Vec<Point2<i32>>;

/// Contour operations the target classifier relies on.
///
/// The classifier never talks to an image-processing library directly; it
/// goes through this trait. [`PlanarGeometry`] is the built-in backend.
pub trait ContourGeometry {
    /// Convex hull of a point set, without collinear vertices.
    fn convex_hull(&self, points: &[Point2<i32>]) -> PointSequence;

    /// Reduce a point sequence to fewer vertices within `epsilon` pixels.
    fn approx_polygon(&self, points: &[Point2<i32>], epsilon: f64, closed: bool)
        -> PointSequence;

    /// Unsigned enclosed area of a closed point sequence.
    fn contour_area(&self, points: &[Point2<i32>]) -> f64;

    /// Whether the closed polygon is simple and strictly convex.
    fn is_convex(&self, points: &[Point2<i32>]) -> bool;
}

/// Pure-Rust contour geometry backend.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlanarGeometry;

impl ContourGeometry for PlanarGeometry {
    #[inline]
    fn convex_hull(&self, points: &[Point2<i32>]) -> PointSequence {
        convex_hull(points)
    }

    #[inline]
    fn approx_polygon(
        &self,
        points: &[Point2<i32>],
        epsilon: f64,
        closed: bool,
    ) -> PointSequence {
        approx_polygon(points, epsilon, closed)
    }

    #[inline]
    fn contour_area(&self, points: &[Point2<i32>]) -> f64 {
        contour_area(points)
    }

    #[inline]
    fn is_convex(&self, points: &[Point2<i32>]) -> bool {
        is_convex(points)
    }
}

/// Axis-aligned bounding box over integer points (inclusive extremes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl BoundingBox {
    /// Bounding box of `points`, `None` for an empty sequence.
    pub fn from_points(points: &[Point2<i32>]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |bb, p| Self {
            min_x: bb.min_x.min(p.x),
            max_x: bb.max_x.max(p.x),
            min_y: bb.min_y.min(p.y),
            max_y: bb.max_y.max(p.y),
        }))
    }

    /// `max_x - min_x`.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max_x as i64 - self.min_x as i64
    }

    /// `max_y - min_y`.
    #[inline]
    pub fn height(&self) -> i64 {
        self.max_y as i64 - self.min_y as i64
    }
}

/// `to - from` widened to `i128`.
#[inline]
fn delta(from: Point2<i32>, to: Point2<i32>) -> (i128, i128) {
    (
        to.x as i128 - from.x as i128,
        to.y as i128 - from.y as i128,
    )
}

#[inline]
fn cross(o: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> i128 {
    let (ax, ay) = delta(o, a);
    let (bx, by) = delta(o, b);
    ax * by - ay * bx
}

/// Convex hull using Andrew's monotone chain.
///
/// Collinear points on hull edges are dropped, duplicate input points are
/// ignored. Fewer than three distinct points are returned as-is (sorted).
pub fn convex_hull(points: &[Point2<i32>]) -> PointSequence {
    let mut pts = points.to_vec();
    pts.sort_unstable_by_key(|p| (p.x, p.y));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: PointSequence = Vec::with_capacity(pts.len() + 1);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }

    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0
        {
            hull.pop();
        }
        hull.push(p);
    }

    // last point repeats the first one
    hull.pop();
    hull
}

/// Douglas–Peucker polygon approximation.
///
/// For closed contours the sequence is split at the two mutually farthest
/// vertices (refined over a few passes, starting from the first point) and
/// each half is simplified independently. The two split vertices are never
/// tested by the recursion, so a final pass drops any vertex that lies within
/// `epsilon / sqrt(2)` of the slanted chord between its neighbours. The output
/// keeps the cyclic order of the input and starts at the first split vertex.
pub fn approx_polygon(points: &[Point2<i32>], epsilon: f64, closed: bool) -> PointSequence {
    if points.len() < 3 {
        return points.to_vec();
    }
    if !closed {
        return simplify_chain(points, epsilon);
    }

    let (start, end) = farthest_pair(points);
    if start == end {
        return vec![points[start]];
    }

    let mut out = simplify_chain(&cyclic_run(points, start, end), epsilon);
    let back = simplify_chain(&cyclic_run(points, end, start), epsilon);
    // `back` begins with `end` and finishes with `start`, both already present
    out.extend_from_slice(&back[1..back.len() - 1]);
    drop_near_collinear(out, epsilon)
}

/// Remove closed-polygon vertices that sit on a slanted straight run.
///
/// A vertex goes when its distance to the chord joining its neighbours is at
/// most `epsilon / sqrt(2)`, it lies between them, and the chord is neither
/// horizontal nor vertical. At least three vertices are kept.
fn drop_near_collinear(polygon: PointSequence, epsilon: f64) -> PointSequence {
    let n = polygon.len();
    if n <= 3 {
        return polygon;
    }

    let limit = 0.5 * epsilon * epsilon;
    let mut keep = vec![true; n];
    let mut remaining = n;
    let mut prev = polygon[n - 1];
    for i in 0..n {
        let pos = polygon[i];
        let next = polygon[(i + 1) % n];
        let (dx, dy) = delta(prev, next);
        let (px, py) = delta(prev, pos);
        let (qx, qy) = delta(pos, next);

        let dist = (px * dy - py * dx) as f64;
        let chord2 = (dx * dx + dy * dy) as f64;
        let between = px * qx + py * qy >= 0;
        if remaining > 3 && dx != 0 && dy != 0 && between && dist * dist <= limit * chord2 {
            keep[i] = false;
            remaining -= 1;
        } else {
            prev = pos;
        }
    }

    polygon
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(p))
        .collect()
}

fn farthest_from(points: &[Point2<i32>], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_d2 = 0i128;
    for (i, &p) in points.iter().enumerate() {
        let (dx, dy) = delta(origin, p);
        let d2 = dx * dx + dy * dy;
        if d2 > best_d2 {
            best_d2 = d2;
            best = i;
        }
    }
    best
}

fn farthest_pair(points: &[Point2<i32>]) -> (usize, usize) {
    const PASSES: usize = 3;
    let mut start = 0;
    let mut end = farthest_from(points, start);
    for _ in 1..PASSES {
        let next = farthest_from(points, end);
        start = end;
        end = next;
    }
    (start, end)
}

/// Points `from..=to` walking forward with wrap-around.
fn cyclic_run(points: &[Point2<i32>], from: usize, to: usize) -> PointSequence {
    let n = points.len();
    let len = (to + n - from) % n + 1;
    (0..len).map(|k| points[(from + k) % n]).collect()
}

fn simplify_chain(points: &[Point2<i32>], epsilon: f64) -> PointSequence {
    if points.len() < 3 {
        return points.to_vec();
    }
    let last = points.len() - 1;
    let (a, b) = (points[0], points[last]);

    let mut split = 0;
    let mut max_d = 0.0;
    for (i, &p) in points.iter().enumerate().take(last).skip(1) {
        let d = line_distance(p, a, b);
        if d > max_d {
            max_d = d;
            split = i;
        }
    }

    if max_d > epsilon {
        let mut left = simplify_chain(&points[..=split], epsilon);
        let right = simplify_chain(&points[split..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![a, b]
    }
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn line_distance(p: Point2<i32>, a: Point2<i32>, b: Point2<i32>) -> f64 {
    let dx = b.x as f64 - a.x as f64;
    let dy = b.y as f64 - a.y as f64;
    let px = p.x as f64 - a.x as f64;
    let py = p.y as f64 - a.y as f64;
    let mag = dx.hypot(dy);
    if mag < f64::EPSILON {
        return px.hypot(py);
    }
    (dx * py - dy * px).abs() / mag
}

/// Unsigned shoelace area of a closed point sequence.
pub fn contour_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice: i128 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i128 * q.y as i128 - q.x as i128 * p.y as i128)
        .sum();
    (twice as f64).abs() * 0.5
}

/// Strict convexity test for a closed polygon.
///
/// Every corner must turn the same way (no collinear or repeated vertices) and
/// the boundary must wind exactly once, which rejects self-intersecting stars.
pub fn is_convex(points: &[Point2<i32>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0i128;
    let mut turning = 0.0f64;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let (ux, uy) = delta(a, b);
        let (vx, vy) = delta(b, c);

        let turn = ux * vy - uy * vx;
        if turn == 0 {
            return false;
        }
        if sign == 0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
        turning += (turn as f64).atan2((ux * vx + uy * vy) as f64);
    }

    (turning.abs() - std::f64::consts::TAU).abs() < 1e-6
}
