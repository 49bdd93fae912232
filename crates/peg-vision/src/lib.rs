//! High-level facade crate for the `peg-vision-*` workspace.
//!
//! This crate provides:
//! - stable re-exports of the core and target crates
//! - (feature-gated) end-to-end helpers that threshold an RGB image, extract
//!   external contours with `imageproc` and classify them
//! - (feature-gated) overlay rendering of each pipeline stage
//!
//! ## Quickstart
//!
//! ```no_run
//! use peg_vision::detect;
//! use peg_vision::target::TargetFilterParams;
//! use peg_vision::core::HsvRange;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = detect::load_rgb("frame.png")?;
//! let detection =
//!     detect::detect_peg_target(&img, &HsvRange::default(), TargetFilterParams::default())?;
//! if let Some(target) = detection.frame.best_target() {
//!     println!("target at {:?}", target.centroid());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `peg_vision::core`: points, geometry backend, HSV thresholding.
//! - `peg_vision::target`: contour classification, config/report I/O, aiming.
//! - `peg_vision::detect` (feature `image`): end-to-end helpers on `image::RgbImage`.
//! - `peg_vision::overlay` (feature `image`): debug rendering per display mode.

pub use peg_vision_core as core;
pub use peg_vision_target as target;

pub use peg_vision_core::{HsvRange, PointSequence};
pub use peg_vision_target::{FrameResult, PegTargetDetector, TargetCandidate, TargetFilterParams};

#[cfg(feature = "image")]
pub mod detect;

#[cfg(feature = "image")]
pub mod overlay;
