//! Turning a goal polygon into a reported candidate.

use crate::detector::{TargetCandidate, TargetMetrics};
use nalgebra::Point2;
use peg_vision_core::BoundingBox;

/// Candidate with bounding metrics (and centroid, for quadrilaterals).
pub fn describe(points: &[Point2<i32>]) -> TargetCandidate {
    TargetCandidate {
        points: points.to_vec(),
        metrics: measure(points),
    }
}

/// Candidate carrying only its polygon.
pub fn unmeasured(points: &[Point2<i32>]) -> TargetCandidate {
    TargetCandidate {
        points: points.to_vec(),
        metrics: None,
    }
}

/// Bounding width/height and, for four points, the vertex centroid.
pub fn measure(points: &[Point2<i32>]) -> Option<TargetMetrics> {
    let bounds = BoundingBox::from_points(points)?;
    Some(TargetMetrics {
        centroid: quad_centroid(points),
        width: bounds.width() as f64,
        height: bounds.height() as f64,
        bounds,
    })
}

/// Integer mean of exactly four vertices (truncated toward zero).
pub fn quad_centroid(points: &[Point2<i32>]) -> Option<Point2<f64>> {
    let [a, b, c, d] = points else {
        return None;
    };
    let sx = a.x as i64 + b.x as i64 + c.x as i64 + d.x as i64;
    let sy = a.y as i64 + b.y as i64 + c.y as i64 + d.y as i64;
    Some(Point2::new((sx / 4) as f64, (sy / 4) as f64))
}
