//! Core types and utilities for peg target detection.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete image library: contour geometry is reached through
//! the [`ContourGeometry`] trait and images through lightweight views.

mod geometry;
mod image;
mod logger;

pub use geometry::{
    approx_polygon, contour_area, convex_hull, is_convex, BoundingBox, ContourGeometry,
    PlanarGeometry, PointSequence,
};
pub use image::{
    rgb_to_hsv, threshold_hsv, BinaryMask, Hsv, HsvRange, ImageViewError, RgbImageView,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
