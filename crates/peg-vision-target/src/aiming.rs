//! Conversion of accepted targets into camera-relative aiming angles.
//!
//! Coordinate frame: +x along the optical axis, +y to the left of the image,
//! +z to the top. `h_angle` is measured in the xy plane and `v_angle` in the xz
//! plane, so a target left of (or above) the image center has a positive angle.

use crate::detector::{FrameResult, TargetCandidate};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// The downstream message carries at most this many targets.
pub const MAX_REPORTED_TARGETS: usize = 3;

/// Pinhole camera described by resolution and field of view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraModel {
    pub width_px: u32,
    pub height_px: u32,
    pub horizontal_fov_rad: f64,
    pub vertical_fov_rad: f64,
}

impl Default for CameraModel {
    /// 640x480 with a 60 degree horizontal field of view and square pixels.
    fn default() -> Self {
        let horizontal_fov_rad = std::f64::consts::FRAC_PI_3;
        let vertical_fov_rad = 2.0 * ((horizontal_fov_rad / 2.0).tan() * 480.0 / 640.0).atan();
        Self {
            width_px: 640,
            height_px: 480,
            horizontal_fov_rad,
            vertical_fov_rad,
        }
    }
}

impl CameraModel {
    /// Focal length in pixels implied by the horizontal field of view.
    pub fn focal_length_px(&self) -> f64 {
        (self.width_px as f64 / 2.0) / (self.horizontal_fov_rad / 2.0).tan()
    }

    /// Optical center in pixel coordinates (between the two middle pixels).
    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            self.width_px as f64 / 2.0 - 0.5,
            self.height_px as f64 / 2.0 - 0.5,
        )
    }

    /// Aiming info for a candidate; `None` without a centroid.
    pub fn target_info(&self, target: &TargetCandidate) -> Option<CameraTargetInfo> {
        let metrics = target.metrics?;
        let centroid = metrics.centroid?;
        let focal = self.focal_length_px();
        let center = self.center();
        Some(CameraTargetInfo {
            h_angle: (-(centroid.x - center.x)).atan2(focal),
            v_angle: (-(centroid.y - center.y)).atan2(focal),
            h_width: metrics.width / self.width_px as f64 * self.horizontal_fov_rad,
            v_width: metrics.height / self.height_px as f64 * self.vertical_fov_rad,
        })
    }
}

/// Angular position and extent of one target, in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraTargetInfo {
    pub h_angle: f64,
    pub v_angle: f64,
    pub h_width: f64,
    pub v_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Targets,
}

/// Per-frame update sent to the robot side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetUpdateMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub timestamp_ns: u64,
    pub targets: Vec<CameraTargetInfo>,
}

impl TargetUpdateMessage {
    /// Build the update from the accepted targets of a frame.
    pub fn from_frame(frame: &FrameResult, camera: &CameraModel, timestamp_ns: u64) -> Self {
        let targets = frame
            .accepted
            .iter()
            .filter_map(|t| camera.target_info(t))
            .take(MAX_REPORTED_TARGETS)
            .collect();
        Self {
            kind: MessageKind::Targets,
            timestamp_ns,
            targets,
        }
    }
}
