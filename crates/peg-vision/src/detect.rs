use crate::{core, target};
use ::image::{GrayImage, ImageReader, Luma, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the high-level facade helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("invalid RGB image buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error("invalid RGB image dimensions (width={width}, height={height})")]
    InvalidRgbDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Params(#[from] target::TargetParamsError),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything one frame went through: the mask, its contours and the verdict.
#[derive(Clone, Debug)]
pub struct PegDetection {
    pub mask: GrayImage,
    pub contours: Vec<core::PointSequence>,
    pub frame: target::FrameResult,
}

/// Convert an `image::RgbImage` into the lightweight `peg-vision-core` view type.
pub fn rgb_view(img: &RgbImage) -> core::RgbImageView<'_> {
    core::RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Load an image from disk and convert it to 8-bit RGB.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, DetectError> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

/// HSV threshold as a grayscale mask (255 inside the range, 0 elsewhere).
pub fn threshold_mask(img: &RgbImage, hsv: &core::HsvRange) -> GrayImage {
    let mask = core::threshold_hsv(&rgb_view(img), hsv);
    log::debug!(
        "{} of {} pixels inside the HSV range",
        mask.count_set(),
        mask.data.len()
    );
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        Luma([if mask.is_set(x as usize, y as usize) { 255 } else { 0 }])
    })
}

/// Outer borders of the foreground regions that have no enclosing border.
///
/// Holes and regions nested inside other regions are dropped, matching an
/// external-only retrieval mode.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(mask), fields(width = mask.width(), height = mask.height()))
)]
pub fn find_external_contours(mask: &GrayImage) -> Vec<core::PointSequence> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points.iter().map(|p| Point2::new(p.x, p.y)).collect())
        .collect()
}

/// Run threshold -> contour extraction -> classification with an existing detector.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(detector, img, hsv),
        fields(width = img.width(), height = img.height())
    )
)]
pub fn detect_with(
    detector: &target::PegTargetDetector,
    img: &RgbImage,
    hsv: &core::HsvRange,
) -> PegDetection {
    let mask = threshold_mask(img, hsv);
    let contours = find_external_contours(&mask);
    log::debug!("{} external contours", contours.len());
    let frame = detector.classify_frame(&contours);
    PegDetection {
        mask,
        contours,
        frame,
    }
}

/// Run the peg target detector end-to-end on an RGB image.
pub fn detect_peg_target(
    img: &RgbImage,
    hsv: &core::HsvRange,
    params: target::TargetFilterParams,
) -> Result<PegDetection, DetectError> {
    let detector = target::PegTargetDetector::new(params)?;
    Ok(detect_with(&detector, img, hsv))
}

/// Build an `image::RgbImage` from a raw interleaved RGB buffer.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<RgbImage, DetectError> {
    let w = usize::try_from(width).ok();
    let h = usize::try_from(height).ok();
    let Some((w, h)) = w.zip(h) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    let Some(expected) = w.checked_mul(h).and_then(|n| n.checked_mul(3)) else {
        return Err(DetectError::InvalidRgbDimensions { width, height });
    };
    if pixels.len() != expected {
        return Err(DetectError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or(DetectError::InvalidRgbDimensions { width, height })
}

pub fn detect_peg_target_from_rgb_u8(
    width: u32,
    height: u32,
    pixels: &[u8],
    hsv: &core::HsvRange,
    params: target::TargetFilterParams,
) -> Result<PegDetection, DetectError> {
    let img = rgb_image_from_slice(width, height, pixels)?;
    detect_peg_target(&img, hsv, params)
}
