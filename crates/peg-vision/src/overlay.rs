//! Debug rendering of the detection pipeline.
//!
//! Rendering never feeds back into classification: it only reads a finished
//! [`PegDetection`](crate::detect::PegDetection).

use crate::detect::PegDetection;
use ::image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_line_segment_mut};
use nalgebra::Point2;

const TARGET_COLOR: Rgb<u8> = Rgb([0, 112, 255]);
const REJECTED_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const CENTROID_RADIUS: i32 = 5;

/// Which pipeline stage to draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DisplayMode {
    /// Input frame untouched.
    Raw,
    /// Threshold mask.
    Threshold,
    /// Raw external contours over the mask.
    Contours,
    /// Convex hulls of the two largest contours over the mask.
    ConvexContours,
    /// Approximated polygons of the two largest contours over the mask.
    Polygons,
    /// Accepted targets and their centroids over the input frame.
    Targets,
    /// Accepted targets plus rejected candidates in red.
    #[default]
    TargetsPlus,
}

/// Render `detection` over `input` according to `mode`.
pub fn render_overlay(input: &RgbImage, detection: &PegDetection, mode: DisplayMode) -> RgbImage {
    match mode {
        DisplayMode::Raw => input.clone(),
        DisplayMode::Threshold => mask_to_rgb(&detection.mask),
        DisplayMode::Contours => {
            let mut canvas = mask_to_rgb(&detection.mask);
            for contour in &detection.contours {
                draw_closed_polyline(&mut canvas, contour, TARGET_COLOR);
            }
            canvas
        }
        DisplayMode::ConvexContours => {
            let mut canvas = mask_to_rgb(&detection.mask);
            for shape in &detection.frame.shapes {
                draw_closed_polyline(&mut canvas, &shape.hull, TARGET_COLOR);
            }
            canvas
        }
        DisplayMode::Polygons => {
            let mut canvas = mask_to_rgb(&detection.mask);
            for shape in &detection.frame.shapes {
                draw_closed_polyline(&mut canvas, &shape.polygon, TARGET_COLOR);
            }
            canvas
        }
        DisplayMode::Targets | DisplayMode::TargetsPlus => {
            let mut canvas = input.clone();
            for target in &detection.frame.accepted {
                draw_closed_polyline(&mut canvas, &target.points, TARGET_COLOR);
                if let Some(c) = target.centroid() {
                    draw_hollow_circle_mut(
                        &mut canvas,
                        (c.x as i32, c.y as i32),
                        CENTROID_RADIUS,
                        TARGET_COLOR,
                    );
                }
            }
            if mode == DisplayMode::TargetsPlus {
                for rejected in &detection.frame.rejected {
                    draw_closed_polyline(&mut canvas, &rejected.candidate.points, REJECTED_COLOR);
                }
            }
            canvas
        }
    }
}

fn mask_to_rgb(mask: &GrayImage) -> RgbImage {
    RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

fn draw_closed_polyline(canvas: &mut RgbImage, points: &[Point2<i32>], color: Rgb<u8>) {
    if points.len() < 2 {
        return;
    }
    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        draw_line_segment_mut(
            canvas,
            (a.x as f32, a.y as f32),
            (b.x as f32, b.y as f32),
            color,
        );
    }
}
