//! JSON configuration and report helpers for peg target detection.

use crate::{
    CameraModel, FrameResult, PegTargetDetector, TargetFilterParams, TargetParamsError,
    TargetUpdateMessage,
};
use peg_vision_core::HsvRange;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Display,
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum PegTargetIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for a single-image detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegTargetConfig {
    pub image_path: String,
    #[serde(default)]
    pub hsv: HsvRange,
    #[serde(default)]
    pub params: Option<TargetFilterParams>,
    #[serde(default)]
    pub camera: Option<CameraModel>,
    #[serde(default)]
    pub output_path: Option<String>,
}

impl PegTargetConfig {
    /// Config for `image_path` with every other setting at its default.
    pub fn for_image(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            hsv: HsvRange::default(),
            params: None,
            camera: None,
            output_path: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PegTargetIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PegTargetIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("peg_target_report.json"))
    }

    /// Filter parameters, defaults unless overridden.
    pub fn build_params(&self) -> TargetFilterParams {
        self.params.clone().unwrap_or_default()
    }

    pub fn camera(&self) -> CameraModel {
        self.camera.unwrap_or_default()
    }

    /// Build a validated detector from this config.
    pub fn build_detector(&self) -> Result<PegTargetDetector, TargetParamsError> {
        PegTargetDetector::new(self.build_params())
    }
}

/// Everything a detection run produced, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PegTargetReport {
    pub image_path: String,
    #[serde(default)]
    pub config_path: Option<String>,
    pub hsv: HsvRange,
    pub num_contours: usize,
    #[serde(default)]
    pub frame: Option<FrameResult>,
    #[serde(default)]
    pub update: Option<TargetUpdateMessage>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PegTargetReport {
    /// Base report for a config, before any detection ran.
    pub fn new(cfg: &PegTargetConfig, config_path: Option<&Path>) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.map(|p| p.to_string_lossy().into_owned()),
            hsv: cfg.hsv,
            num_contours: 0,
            frame: None,
            update: None,
            error: None,
        }
    }

    /// Populate the frame result and the derived target update.
    pub fn set_frame(
        &mut self,
        num_contours: usize,
        frame: FrameResult,
        camera: &CameraModel,
        timestamp_ns: u64,
    ) {
        self.num_contours = num_contours;
        self.update = Some(TargetUpdateMessage::from_frame(&frame, camera, timestamp_ns));
        self.frame = Some(frame);
        self.error = None;
    }

    /// Record a failure.
    pub fn set_error(&mut self, err: impl Display) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PegTargetIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PegTargetIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrameOutcome;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg: PegTargetConfig =
            serde_json::from_str(r#"{"image_path":"frame.png"}"#).expect("parse");
        assert_eq!(cfg.hsv, HsvRange::default());
        assert_eq!(cfg.build_params(), TargetFilterParams::default());
        assert_eq!(cfg.camera(), CameraModel::default());
        assert_eq!(cfg.output_path(), PathBuf::from("peg_target_report.json"));
        assert!(cfg.build_detector().is_ok());
    }

    #[test]
    fn invalid_param_overrides_fail_to_build() {
        let cfg: PegTargetConfig = serde_json::from_str(
            r#"{"image_path":"frame.png","params":{"fullness":{"min":0.8,"max":0.2}}}"#,
        )
        .expect("parse");
        assert!(matches!(
            cfg.build_detector(),
            Err(TargetParamsError::InvalidRange {
                name: "fullness",
                ..
            })
        ));
    }

    #[test]
    fn report_written_to_disk_can_be_reloaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = PegTargetConfig::for_image("frame.png");
        let config_path = dir.path().join("cfg.json");
        cfg.write_json(&config_path).expect("write config");

        let mut report = PegTargetReport::new(&cfg, Some(&config_path));
        report.set_frame(
            0,
            FrameResult {
                accepted: Vec::new(),
                rejected: Vec::new(),
                shapes: Vec::new(),
                outcome: FrameOutcome::TooFewContours { found: 0 },
            },
            &CameraModel::default(),
            7,
        );
        let out = dir.path().join("report.json");
        report.write_json(&out).expect("write report");

        let loaded = PegTargetReport::load_json(&out).expect("load report");
        assert_eq!(loaded.image_path, "frame.png");
        assert_eq!(
            loaded.frame.map(|f| f.outcome),
            Some(FrameOutcome::TooFewContours { found: 0 })
        );
        assert_eq!(loaded.update.map(|u| u.timestamp_ns), Some(7));
        assert!(loaded.error.is_none());
    }

    #[test]
    fn missing_config_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = PegTargetConfig::load_json(dir.path().join("nope.json")).expect_err("missing");
        assert!(matches!(err, PegTargetIoError::Io(_)));
    }
}
