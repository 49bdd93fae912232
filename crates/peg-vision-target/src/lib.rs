//! Peg target classification.
//!
//! Given the external contours of a thresholded frame, find the pair of
//! retro-reflective strips that forms a peg target:
//! - the two largest contours are reduced to hull + polygon,
//! - both must be convex quadrilaterals,
//! - their merged polygon must pass size, edge-slope and fullness filters.
//!
//! Image decoding and contour extraction live in the `peg-vision` facade;
//! this crate only sees point sequences.

mod aiming;
mod classifier;
mod descriptor;
mod detector;
mod io;
mod normalize;
mod sorter;

pub use aiming::{
    CameraModel, CameraTargetInfo, MessageKind, TargetUpdateMessage, MAX_REPORTED_TARGETS,
};
pub use classifier::{
    check_edge_alternation, classify_edge, classify_pair, merge_goal, EdgeCheck,
    EdgeOrientation, EdgeTally, PairVerdict,
};
pub use descriptor::{describe, measure, quad_centroid, unmeasured};
pub use detector::{
    FrameOutcome, FrameResult, FullnessRange, PegTargetDetector, RejectReason, RejectedTarget,
    SizeLimits, SlopeThresholds, TargetCandidate, TargetFilterParams, TargetMetrics,
    TargetParamsError,
};
pub use io::{PegTargetConfig, PegTargetIoError, PegTargetReport};
pub use normalize::{is_rectangular, normalize_shape, NormalizedShape};
pub use sorter::{sort_by_area, ContourRecord};

pub use peg_vision_core::{BoundingBox, ContourGeometry, PlanarGeometry, PointSequence};
