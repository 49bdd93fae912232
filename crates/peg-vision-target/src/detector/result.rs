use crate::normalize::NormalizedShape;
use nalgebra::Point2;
use peg_vision_core::{BoundingBox, PointSequence};
use serde::{Deserialize, Serialize};

/// Bounding metrics of a candidate polygon, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetMetrics {
    /// Mean of the four vertices; `None` unless the polygon is a quadrilateral.
    pub centroid: Option<Point2<f64>>,
    pub width: f64,
    pub height: f64,
    pub bounds: BoundingBox,
}

/// One target candidate, accepted or rejected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetCandidate {
    /// Polygon in approximation order (4 points for accepted targets).
    pub points: PointSequence,
    /// `None` for shapes rejected before the strips were merged.
    pub metrics: Option<TargetMetrics>,
}

impl TargetCandidate {
    #[inline]
    pub fn centroid(&self) -> Option<Point2<f64>> {
        self.metrics.and_then(|m| m.centroid)
    }

    #[inline]
    pub fn width(&self) -> Option<f64> {
        self.metrics.map(|m| m.width)
    }

    #[inline]
    pub fn height(&self) -> Option<f64> {
        self.metrics.map(|m| m.height)
    }
}

/// Why a candidate was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RejectReason {
    /// One of the two largest shapes is not a convex quadrilateral.
    NotRectangular { vertices: usize },
    /// Goal bounding box outside the size limits.
    Size { width: f64, height: f64 },
    /// Goal polygon does not have exactly four vertices.
    NotQuadrilateral { vertices: usize },
    /// Edges alternate but the orientation counts are not two and two.
    Shape { horizontal: usize, vertical: usize },
    /// Goal polygon encloses no area, fullness is undefined.
    DegenerateArea { goal_area: f64 },
    /// Strip area over goal area outside the fullness range.
    Fullness { fullness: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RejectedTarget {
    pub candidate: TargetCandidate,
    pub reason: RejectReason,
}

/// Which exit of the cascade a frame took.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameOutcome {
    /// Fewer than two contours; nothing to pair.
    TooFewContours { found: usize },
    /// Both largest shapes recorded as rejected without merging.
    NotRectangular,
    /// The merged goal polygon was rejected by a filter.
    Rejected,
    /// Edge `edge` of the goal polygon was ambiguous or broke alternation;
    /// the pair produced no candidate at all.
    Discarded { edge: usize },
    Accepted,
}

/// Output of one `classify_frame` call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub accepted: Vec<TargetCandidate>,
    pub rejected: Vec<RejectedTarget>,
    /// Normalized hull/polygon of the two largest contours (empty when fewer
    /// than two contours were supplied).
    pub shapes: Vec<NormalizedShape>,
    pub outcome: FrameOutcome,
}

impl FrameResult {
    pub(crate) fn empty(outcome: FrameOutcome) -> Self {
        Self {
            accepted: Vec::new(),
            rejected: Vec::new(),
            shapes: Vec::new(),
            outcome,
        }
    }

    /// First accepted target, if any.
    pub fn best_target(&self) -> Option<&TargetCandidate> {
        self.accepted.first()
    }

    /// True when neither accepted nor rejected candidates were produced.
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}
