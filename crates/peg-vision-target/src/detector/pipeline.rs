use super::{
    FrameOutcome, FrameResult, RejectReason, RejectedTarget, TargetFilterParams,
    TargetParamsError,
};
use crate::classifier::{classify_pair, PairVerdict};
use crate::descriptor::unmeasured;
use crate::normalize::normalize_shape;
use crate::sorter::sort_by_area;
use log::{debug, info};
use peg_vision_core::{ContourGeometry, PlanarGeometry, PointSequence};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Per-frame peg target detector.
///
/// Holds only validated parameters and a stateless geometry backend, so one
/// instance can classify frames from several streams.
#[derive(Clone, Debug)]
pub struct PegTargetDetector<G = PlanarGeometry> {
    params: TargetFilterParams,
    geometry: G,
}

impl PegTargetDetector<PlanarGeometry> {
    /// Detector backed by [`PlanarGeometry`].
    pub fn new(params: TargetFilterParams) -> Result<Self, TargetParamsError> {
        Self::with_geometry(params, PlanarGeometry)
    }
}

impl<G: ContourGeometry> PegTargetDetector<G> {
    /// Detector using a custom contour geometry backend.
    pub fn with_geometry(
        params: TargetFilterParams,
        geometry: G,
    ) -> Result<Self, TargetParamsError> {
        params.validate()?;
        Ok(Self { params, geometry })
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &TargetFilterParams {
        &self.params
    }

    /// Classify the external contours of one thresholded frame.
    ///
    /// Only the two largest contours (by enclosed area) are considered. The
    /// result lists the accepted target, if any, and every rejected candidate
    /// together with the reason it was dropped.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, contours), fields(contours = contours.len()))
    )]
    pub fn classify_frame(&self, contours: &[PointSequence]) -> FrameResult {
        if contours.len() < 2 {
            debug!("only {} contours, nothing to pair", contours.len());
            return FrameResult::empty(FrameOutcome::TooFewContours {
                found: contours.len(),
            });
        }

        let records = sort_by_area(&self.geometry, contours);
        let shapes = [
            normalize_shape(&self.geometry, records[0].shape, self.params.approx_epsilon),
            normalize_shape(&self.geometry, records[1].shape, self.params.approx_epsilon),
        ];
        debug!(
            "largest contours: area {:.1} ({} vertices), area {:.1} ({} vertices)",
            records[0].area,
            shapes[0].vertices(),
            records[1].area,
            shapes[1].vertices()
        );

        let mut result = FrameResult::empty(FrameOutcome::Rejected);

        if !(shapes[0].rectangular && shapes[1].rectangular) {
            debug!("rejecting pair: not both rectangular");
            result.rejected = shapes
                .iter()
                .map(|s| RejectedTarget {
                    candidate: unmeasured(&s.polygon),
                    reason: RejectReason::NotRectangular {
                        vertices: s.vertices(),
                    },
                })
                .collect();
            result.outcome = FrameOutcome::NotRectangular;
            result.shapes = shapes.into();
            return result;
        }

        match classify_pair(&self.geometry, [&shapes[0], &shapes[1]], &self.params) {
            PairVerdict::Accepted(target) => {
                if let (Some(c), Some(m)) = (target.centroid(), target.metrics) {
                    info!(
                        "found target at ({:.2}, {:.2}), W:{:.2}, H:{:.2}",
                        c.x, c.y, m.width, m.height
                    );
                }
                result.accepted.push(target);
                result.outcome = FrameOutcome::Accepted;
            }
            PairVerdict::Rejected(rejected) => {
                result.rejected.push(rejected);
            }
            PairVerdict::Discarded { edge } => {
                result.outcome = FrameOutcome::Discarded { edge };
            }
        }
        result.shapes = shapes.into();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> PointSequence {
        vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ]
    }

    #[test]
    fn new_rejects_invalid_params() {
        let params = TargetFilterParams {
            approx_epsilon: -1.0,
            ..TargetFilterParams::default()
        };
        assert!(PegTargetDetector::new(params).is_err());
    }

    #[test]
    fn fewer_than_two_contours_is_empty() {
        let detector = PegTargetDetector::new(TargetFilterParams::default()).expect("detector");
        let result = detector.classify_frame(&[rect(0, 0, 20, 200)]);
        assert!(result.is_empty());
        assert!(result.shapes.is_empty());
        assert_eq!(result.outcome, FrameOutcome::TooFewContours { found: 1 });

        let result = detector.classify_frame(&[]);
        assert_eq!(result.outcome, FrameOutcome::TooFewContours { found: 0 });
    }

    #[test]
    fn only_the_two_largest_contours_count() {
        let detector = PegTargetDetector::new(TargetFilterParams::default()).expect("detector");
        let contours = vec![
            rect(300, 300, 305, 305),
            rect(0, 0, 25, 200),
            rect(75, 0, 100, 200),
        ];
        let result = detector.classify_frame(&contours);
        assert_eq!(result.outcome, FrameOutcome::Accepted);
        assert_eq!(result.accepted.len(), 1);
        assert_eq!(result.shapes.len(), 2);
    }

    #[test]
    fn strips_at_the_coordinate_extremes_are_size_rejected() {
        let detector = PegTargetDetector::new(TargetFilterParams::default()).expect("detector");
        let contours = vec![
            rect(-2_000_000_000, 0, -1_999_999_000, 200),
            rect(1_999_999_000, 0, 2_000_000_000, 200),
        ];
        let result = detector.classify_frame(&contours);
        assert_eq!(result.outcome, FrameOutcome::Rejected);
        assert_eq!(
            result.rejected[0].reason,
            RejectReason::Size {
                width: 4_000_000_000.0,
                height: 200.0
            }
        );
        assert_eq!(
            result.rejected[0].candidate.centroid(),
            Some(Point2::new(0.0, 100.0))
        );
    }

    /// Planar geometry that reports every enclosed area as zero.
    #[derive(Clone, Copy, Debug)]
    struct FlatArea;

    impl ContourGeometry for FlatArea {
        fn convex_hull(&self, points: &[Point2<i32>]) -> PointSequence {
            PlanarGeometry.convex_hull(points)
        }

        fn approx_polygon(
            &self,
            points: &[Point2<i32>],
            epsilon: f64,
            closed: bool,
        ) -> PointSequence {
            PlanarGeometry.approx_polygon(points, epsilon, closed)
        }

        fn contour_area(&self, _points: &[Point2<i32>]) -> f64 {
            0.0
        }

        fn is_convex(&self, points: &[Point2<i32>]) -> bool {
            PlanarGeometry.is_convex(points)
        }
    }

    #[test]
    fn zero_goal_area_is_rejected_as_degenerate() {
        let detector = PegTargetDetector::with_geometry(TargetFilterParams::default(), FlatArea)
            .expect("detector");
        let result = detector.classify_frame(&[rect(0, 0, 25, 200), rect(75, 0, 100, 200)]);

        assert_eq!(result.outcome, FrameOutcome::Rejected);
        assert!(result.accepted.is_empty());
        let rejected = &result.rejected[0];
        assert_eq!(
            rejected.reason,
            RejectReason::DegenerateArea { goal_area: 0.0 }
        );
        assert_eq!(rejected.candidate.width(), Some(100.0));
        assert_eq!(rejected.candidate.centroid(), Some(Point2::new(50.0, 100.0)));
    }

    #[test]
    fn custom_backend_is_validated_too() {
        let params = TargetFilterParams {
            approx_epsilon: f64::NAN,
            ..TargetFilterParams::default()
        };
        assert!(PegTargetDetector::with_geometry(params, FlatArea).is_err());
    }

    #[test]
    fn detector_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PegTargetDetector>();
    }
}
