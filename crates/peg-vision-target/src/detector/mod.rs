//! Peg target detection pipeline.
//!
//! This module wires together contour sorting, shape normalization, the
//! classification cascade and candidate description for a single frame.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::TargetParamsError;
pub use params::{FullnessRange, SizeLimits, SlopeThresholds, TargetFilterParams};
pub use pipeline::PegTargetDetector;
pub use result::{
    FrameOutcome, FrameResult, RejectReason, RejectedTarget, TargetCandidate, TargetMetrics,
};
