//! Rejection cascade applied to the two largest normalized shapes.
//!
//! The two strip polygons are merged into a single *goal* polygon, which then
//! has to pass, in order: the size filter, the edge-slope filter and the
//! fullness filter. Every rejection is a regular outcome; the only path that
//! produces nothing at all is an edge that is ambiguous or breaks alternation.

use crate::descriptor::describe;
use crate::detector::{
    RejectReason, RejectedTarget, SlopeThresholds, TargetCandidate, TargetFilterParams,
};
use crate::normalize::NormalizedShape;
use log::debug;
use nalgebra::Point2;
use peg_vision_core::{ContourGeometry, PointSequence};

/// Orientation of one goal polygon edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeOrientation {
    NearlyHorizontal,
    NearlyVertical,
}

/// Classify the edge `from -> to`; `None` when the slope is in the dead band.
///
/// A vertical edge (`dx == 0`) has infinite slope.
pub fn classify_edge(
    from: Point2<i32>,
    to: Point2<i32>,
    slope: &SlopeThresholds,
) -> Option<EdgeOrientation> {
    let dx = from.x as f64 - to.x as f64;
    let dy = from.y as f64 - to.y as f64;
    let s = if dx != 0.0 { (dy / dx).abs() } else { f64::INFINITY };
    if s <= slope.nearly_horizontal {
        Some(EdgeOrientation::NearlyHorizontal)
    } else if s >= slope.nearly_vertical {
        Some(EdgeOrientation::NearlyVertical)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeTally {
    pub horizontal: usize,
    pub vertical: usize,
}

/// Result of walking the four goal edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeCheck {
    /// All four edges classified with strictly alternating orientation.
    Complete(EdgeTally),
    /// Edge `edge` was ambiguous or repeated the previous orientation.
    Broken { edge: usize },
}

/// Walk edges `quad[i] -> quad[(i + 1) % 4]` requiring strict alternation.
///
/// Edge 0 may have either orientation.
pub fn check_edge_alternation(quad: &[Point2<i32>; 4], slope: &SlopeThresholds) -> EdgeCheck {
    let mut tally = EdgeTally::default();
    let mut previous = None;
    for i in 0..4 {
        let Some(orientation) = classify_edge(quad[i], quad[(i + 1) % 4], slope) else {
            return EdgeCheck::Broken { edge: i };
        };
        if previous == Some(orientation) {
            return EdgeCheck::Broken { edge: i };
        }
        match orientation {
            EdgeOrientation::NearlyHorizontal => tally.horizontal += 1,
            EdgeOrientation::NearlyVertical => tally.vertical += 1,
        }
        previous = Some(orientation);
    }
    EdgeCheck::Complete(tally)
}

/// What the cascade decided for one pair of rectangular shapes.
#[derive(Clone, Debug, PartialEq)]
pub enum PairVerdict {
    Accepted(TargetCandidate),
    Rejected(RejectedTarget),
    /// No candidate of any kind; `edge` is the goal edge that stopped the walk.
    Discarded { edge: usize },
}

/// Merge two strip polygons into the goal polygon.
pub fn merge_goal<G>(geometry: &G, shapes: [&NormalizedShape; 2], epsilon: f64) -> PointSequence
where
    G: ContourGeometry + ?Sized,
{
    let mut merged = Vec::with_capacity(shapes[0].polygon.len() + shapes[1].polygon.len());
    merged.extend_from_slice(&shapes[0].polygon);
    merged.extend_from_slice(&shapes[1].polygon);
    let hull = geometry.convex_hull(&merged);
    geometry.approx_polygon(&hull, epsilon, true)
}

/// Run size, edge-slope and fullness filters on a pair of rectangular shapes.
pub fn classify_pair<G>(
    geometry: &G,
    shapes: [&NormalizedShape; 2],
    params: &TargetFilterParams,
) -> PairVerdict
where
    G: ContourGeometry + ?Sized,
{
    let goal = merge_goal(geometry, shapes, params.approx_epsilon);
    let candidate = describe(&goal);
    let (width, height) = candidate
        .metrics
        .map(|m| (m.width, m.height))
        .unwrap_or((0.0, 0.0));

    if !params.size.contains(width, height) {
        let limits = &params.size;
        debug!(
            "rejecting target due to size: W:{width:.1}, H:{height:.1} \
             (limits W:{:.1}-{:.1}, H:{:.1}-{:.1})",
            limits.min_width, limits.max_width, limits.min_height, limits.max_height
        );
        return reject(candidate, RejectReason::Size { width, height });
    }

    let quad: &[Point2<i32>; 4] = match goal.as_slice().try_into() {
        Ok(quad) => quad,
        Err(_) => {
            debug!("rejecting goal polygon with {} vertices", goal.len());
            let vertices = goal.len();
            return reject(candidate, RejectReason::NotQuadrilateral { vertices });
        }
    };

    let tally = match check_edge_alternation(quad, &params.slope) {
        EdgeCheck::Complete(tally) => tally,
        EdgeCheck::Broken { edge } => {
            debug!("discarding pair: goal edge {edge} breaks alternation");
            return PairVerdict::Discarded { edge };
        }
    };
    if tally.horizontal != 2 || tally.vertical != 2 {
        debug!(
            "rejecting target due to shape: {} horizontal, {} vertical",
            tally.horizontal, tally.vertical
        );
        return reject(
            candidate,
            RejectReason::Shape {
                horizontal: tally.horizontal,
                vertical: tally.vertical,
            },
        );
    }

    let filled =
        geometry.contour_area(&shapes[0].polygon) + geometry.contour_area(&shapes[1].polygon);
    let total = geometry.contour_area(&goal);
    if !(total.is_finite() && total > 0.0) {
        debug!("rejecting target with degenerate goal area {total}");
        return reject(candidate, RejectReason::DegenerateArea { goal_area: total });
    }
    let fullness = filled / total;
    if !params.fullness.contains(fullness) {
        debug!(
            "rejecting target due to fullness: filled {filled:.1}, total {total:.1}, fullness {fullness:.3}"
        );
        return reject(candidate, RejectReason::Fullness { fullness });
    }

    PairVerdict::Accepted(candidate)
}

fn reject(candidate: TargetCandidate, reason: RejectReason) -> PairVerdict {
    PairVerdict::Rejected(RejectedTarget { candidate, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{FullnessRange, SizeLimits};
    use peg_vision_core::PlanarGeometry;

    fn p(x: i32, y: i32) -> Point2<i32> {
        Point2::new(x, y)
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> PointSequence {
        vec![p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)]
    }

    /// Shape whose polygon is exactly `points`.
    fn shape(points: PointSequence) -> NormalizedShape {
        NormalizedShape {
            hull: points.clone(),
            polygon: points,
            rectangular: true,
        }
    }

    /// Two full-height strips `x0..x1` and `x2..x3`.
    fn strip_pair(x0: i32, x1: i32, x2: i32, x3: i32, height: i32) -> [NormalizedShape; 2] {
        [shape(rect(x0, 0, x1, height)), shape(rect(x2, 0, x3, height))]
    }

    /// Two full-height strips spanning `width` x `height` from the origin.
    fn strips(width: i32, height: i32, strip: i32) -> [NormalizedShape; 2] {
        strip_pair(0, strip, width - strip, width, height)
    }

    fn verdict(shapes: &[NormalizedShape; 2], params: &TargetFilterParams) -> PairVerdict {
        classify_pair(&PlanarGeometry, [&shapes[0], &shapes[1]], params)
    }

    /// Params with the size filter isolated: tight approximation so small
    /// goals stay quadrilaterals, and any fullness accepted.
    fn size_only() -> TargetFilterParams {
        TargetFilterParams {
            approx_epsilon: 1.0,
            fullness: FullnessRange { min: 0.0, max: 1.0 },
            ..TargetFilterParams::default()
        }
    }

    #[test]
    fn slope_bands() {
        let slope = SlopeThresholds::default();
        assert_eq!(
            classify_edge(p(0, 0), p(100, 0), &slope),
            Some(EdgeOrientation::NearlyHorizontal)
        );
        assert_eq!(
            classify_edge(p(0, 0), p(0, 100), &slope),
            Some(EdgeOrientation::NearlyVertical)
        );
        assert_eq!(
            classify_edge(p(0, 0), p(100, 80), &slope),
            Some(EdgeOrientation::NearlyHorizontal)
        );
        assert_eq!(
            classify_edge(p(0, 0), p(80, 100), &slope),
            Some(EdgeOrientation::NearlyVertical)
        );
        assert_eq!(classify_edge(p(0, 0), p(100, 100), &slope), None);
        assert_eq!(
            classify_edge(p(i32::MIN, 0), p(i32::MAX, 10), &slope),
            Some(EdgeOrientation::NearlyHorizontal)
        );
        assert_eq!(
            classify_edge(p(0, i32::MAX), p(5, i32::MIN), &slope),
            Some(EdgeOrientation::NearlyVertical)
        );
    }

    #[test]
    fn axis_aligned_rectangle_has_two_of_each() {
        let quad = [p(0, 0), p(100, 0), p(100, 200), p(0, 200)];
        assert_eq!(
            check_edge_alternation(&quad, &SlopeThresholds::default()),
            EdgeCheck::Complete(EdgeTally {
                horizontal: 2,
                vertical: 2
            })
        );
        // starting on a vertical edge is fine too
        let quad = [p(100, 0), p(100, 200), p(0, 200), p(0, 0)];
        assert!(matches!(
            check_edge_alternation(&quad, &SlopeThresholds::default()),
            EdgeCheck::Complete(_)
        ));
    }

    #[test]
    fn diagonal_edge_breaks_alternation() {
        let quad = [p(0, 0), p(20, 20), p(20, 220), p(0, 200)];
        assert_eq!(
            check_edge_alternation(&quad, &SlopeThresholds::default()),
            EdgeCheck::Broken { edge: 0 }
        );
        // steep kite: two vertical edges in a row
        let quad = [p(0, 0), p(10, 100), p(0, 200), p(-100, 100)];
        assert_eq!(
            check_edge_alternation(&quad, &SlopeThresholds::default()),
            EdgeCheck::Broken { edge: 1 }
        );
    }

    #[test]
    fn size_limits_apply_to_goal_bounds() {
        let params = size_only();
        for (w, h) in [(20, 10), (600, 10), (20, 400), (600, 400)] {
            let shapes = strips(w, h, 5);
            assert!(
                matches!(verdict(&shapes, &params), PairVerdict::Accepted(_)),
                "{w}x{h} should pass"
            );
        }
        for (w, h) in [(19, 10), (601, 10), (20, 9), (20, 401)] {
            let shapes = strips(w, h, 5);
            match verdict(&shapes, &params) {
                PairVerdict::Rejected(r) => {
                    assert_eq!(
                        r.reason,
                        RejectReason::Size {
                            width: w as f64,
                            height: h as f64
                        }
                    );
                    assert!(r.candidate.metrics.is_some());
                }
                other => panic!("{w}x{h}: expected size reject, got {other:?}"),
            }
        }
    }

    #[test]
    fn fullness_bounds_are_inclusive() {
        // goal is 100x200 = 20000 in every case
        let params = TargetFilterParams::default();
        let cases = [
            ((0, 10, 91, 100), true),  // 3800 -> 0.19
            ((0, 30, 71, 100), true),  // 11800 -> 0.59
            ((0, 10, 92, 100), false), // 3600 -> 0.18
            ((0, 30, 70, 100), false), // 12000 -> 0.60
        ];
        for ((x0, x1, x2, x3), accept) in cases {
            let shapes = strip_pair(x0, x1, x2, x3, 200);
            let v = verdict(&shapes, &params);
            assert_eq!(
                matches!(v, PairVerdict::Accepted(_)),
                accept,
                "strips {x0}..{x1}, {x2}..{x3}: {v:?}"
            );
        }

        match verdict(&strip_pair(0, 30, 70, 100, 200), &params) {
            PairVerdict::Rejected(r) => {
                assert_eq!(r.reason, RejectReason::Fullness { fullness: 0.6 });
                assert_eq!(r.candidate.width(), Some(100.0));
            }
            other => panic!("expected fullness reject, got {other:?}"),
        }
    }

    #[test]
    fn non_quadrilateral_goal_is_rejected() {
        // two vertical segments: bounding box is fine but the goal has no area
        let shapes = [
            shape(vec![p(0, 0), p(0, 100)]),
            shape(vec![p(0, 50), p(0, 150)]),
        ];
        let params = TargetFilterParams {
            size: SizeLimits {
                min_width: 0.0,
                ..SizeLimits::default()
            },
            ..TargetFilterParams::default()
        };
        match verdict(&shapes, &params) {
            PairVerdict::Rejected(r) => {
                assert!(matches!(r.reason, RejectReason::NotQuadrilateral { vertices: 2 }))
            }
            other => panic!("expected reject, got {other:?}"),
        }
    }

    #[test]
    fn accepted_candidate_has_quad_metrics() {
        let shapes = strips(100, 200, 20);
        match verdict(&shapes, &TargetFilterParams::default()) {
            PairVerdict::Accepted(c) => {
                assert_eq!(c.points.len(), 4);
                assert_eq!(c.width(), Some(100.0));
                assert_eq!(c.height(), Some(200.0));
                assert_eq!(c.centroid(), Some(Point2::new(50.0, 100.0)));
            }
            other => panic!("expected accept, got {other:?}"),
        }
    }
}
