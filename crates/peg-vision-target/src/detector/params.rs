use super::TargetParamsError;
use serde::{Deserialize, Serialize};

/// Inclusive limits on the goal polygon's bounding box, in source pixels.
///
/// Width and height are measured on the imager, so they depend on camera
/// orientation and resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeLimits {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 20.0,
            max_width: 600.0,
            min_height: 10.0,
            max_height: 400.0,
        }
    }
}

impl SizeLimits {
    #[inline]
    pub fn contains(&self, width: f64, height: f64) -> bool {
        width >= self.min_width
            && width <= self.max_width
            && height >= self.min_height
            && height <= self.max_height
    }
}

/// Absolute-slope thresholds for classifying goal polygon edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlopeThresholds {
    /// `|dy/dx| <=` this is nearly horizontal.
    pub nearly_horizontal: f64,
    /// `|dy/dx| >=` this is nearly vertical.
    pub nearly_vertical: f64,
}

impl Default for SlopeThresholds {
    fn default() -> Self {
        Self {
            nearly_horizontal: 1.0 / 1.25,
            nearly_vertical: 1.25,
        }
    }
}

/// Inclusive range for the strip-area / goal-area ratio.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FullnessRange {
    pub min: f64,
    pub max: f64,
}

impl Default for FullnessRange {
    /// 0.39 +/- 0.20: two strips cover well under half of their outer hull.
    fn default() -> Self {
        Self {
            min: 0.19,
            max: 0.59,
        }
    }
}

impl FullnessRange {
    #[inline]
    pub fn contains(&self, fullness: f64) -> bool {
        fullness >= self.min && fullness <= self.max
    }
}

/// Configuration for the peg target classifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetFilterParams {
    /// Douglas–Peucker tolerance (pixels) for both strip and goal polygons.
    pub approx_epsilon: f64,
    pub size: SizeLimits,
    pub slope: SlopeThresholds,
    pub fullness: FullnessRange,
}

impl Default for TargetFilterParams {
    fn default() -> Self {
        Self {
            approx_epsilon: 20.0,
            size: SizeLimits::default(),
            slope: SlopeThresholds::default(),
            fullness: FullnessRange::default(),
        }
    }
}

impl TargetFilterParams {
    /// Check that every threshold is finite and every range is ordered.
    pub fn validate(&self) -> Result<(), TargetParamsError> {
        if !(self.approx_epsilon.is_finite() && self.approx_epsilon > 0.0) {
            return Err(TargetParamsError::NonPositiveEpsilon {
                epsilon: self.approx_epsilon,
            });
        }
        check_range("width", self.size.min_width, self.size.max_width)?;
        check_range("height", self.size.min_height, self.size.max_height)?;
        check_range("fullness", self.fullness.min, self.fullness.max)?;

        let SlopeThresholds {
            nearly_horizontal,
            nearly_vertical,
        } = self.slope;
        if !(nearly_horizontal > 0.0 && nearly_horizontal < nearly_vertical) {
            return Err(TargetParamsError::SlopeOrder {
                horizontal: nearly_horizontal,
                vertical: nearly_vertical,
            });
        }
        Ok(())
    }
}

fn check_range(name: &'static str, min: f64, max: f64) -> Result<(), TargetParamsError> {
    if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
        Ok(())
    } else {
        Err(TargetParamsError::InvalidRange { name, min, max })
    }
}
