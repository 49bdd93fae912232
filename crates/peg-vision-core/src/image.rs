//! RGB views, HSV conversion and color thresholding.
//!
//! HSV follows the 8-bit convention used by most vision toolkits: hue is
//! halved into `[0, 180)`, saturation and value span `[0, 255]`.

use serde::{Deserialize, Serialize};

/// Errors raised when wrapping a raw pixel buffer.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ImageViewError {
    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    BufferSize { expected: usize, got: usize },
    #[error("image dimensions overflow (width={width}, height={height})")]
    Dimensions { width: usize, height: usize },
}

#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major RGB, len = 3*w*h
}

impl<'a> RgbImageView<'a> {
    /// Wrap an interleaved RGB buffer, checking its length.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self, ImageViewError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(ImageViewError::Dimensions { width, height })?;
        if data.len() != expected {
            return Err(ImageViewError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

/// Single-channel mask: 255 where a pixel passed the threshold, 0 elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl BinaryMask {
    #[inline]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x] != 0
    }

    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Inclusive per-channel HSV bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl Default for HsvRange {
    /// Any hue and saturation, bright pixels only (retro-reflective tape lit
    /// by a ring light).
    fn default() -> Self {
        Self {
            lower: Hsv::new(0, 0, 130),
            upper: Hsv::new(255, 255, 255),
        }
    }
}

impl HsvRange {
    #[inline]
    pub fn contains(&self, px: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&px.h)
            && (self.lower.s..=self.upper.s).contains(&px.s)
            && (self.lower.v..=self.upper.v).contains(&px.v)
    }
}

/// Convert one RGB pixel to 8-bit HSV.
pub fn rgb_to_hsv([r, g, b]: [u8; 3]) -> Hsv {
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = (v - min) as f32;

    let s = if v == 0 {
        0
    } else {
        (diff * 255.0 / v as f32).round() as u8
    };

    if diff == 0.0 {
        return Hsv::new(0, s, v);
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut h = if v as f32 == r {
        60.0 * (g - b) / diff
    } else if v as f32 == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    let h = (h * 0.5).round() as u8;
    Hsv::new(if h >= 180 { 0 } else { h }, s, v)
}

/// Keep pixels whose HSV value falls inside `range`.
pub fn threshold_hsv(src: &RgbImageView<'_>, range: &HsvRange) -> BinaryMask {
    let data = src
        .data
        .chunks_exact(3)
        .map(|px| {
            if range.contains(rgb_to_hsv([px[0], px[1], px[2]])) {
                255
            } else {
                0
            }
        })
        .collect();
    BinaryMask {
        width: src.width,
        height: src.height,
        data,
    }
}
