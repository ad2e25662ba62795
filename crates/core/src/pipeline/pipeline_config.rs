use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detector::DetectionParams;
use crate::shared::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_CLUSTER_OVERLAP, DEFAULT_QUALITY_THRESHOLD,
    DEFAULT_ROTATION_ANGLE,
};
use crate::shared::error::PipelineError;

/// Numeric knobs consumed by the orchestrator.
///
/// Partial JSON files are accepted; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub detection: DetectionParams,
    /// Cascade rotation as a fraction of a full turn (0.0 to 1.0).
    pub rotation_angle: f64,
    pub cluster_overlap_threshold: f64,
    pub quality_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection: DetectionParams::default(),
            rotation_angle: DEFAULT_ROTATION_ANGLE,
            cluster_overlap_threshold: DEFAULT_CLUSTER_OVERLAP,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        let d = &self.detection;
        if d.min_size == 0 || d.max_size == 0 {
            return Err(PipelineError::config(format!(
                "face sizes must be positive, got min_size={} max_size={}",
                d.min_size, d.max_size
            )));
        }
        if d.min_size >= d.max_size {
            return Err(PipelineError::config(format!(
                "min_size must be below max_size, got {} >= {}",
                d.min_size, d.max_size
            )));
        }
        if !(d.shift_factor > 0.0 && d.shift_factor.is_finite()) {
            return Err(PipelineError::config(format!(
                "shift_factor must be positive, got {}",
                d.shift_factor
            )));
        }
        if !(d.scale_factor > 1.0 && d.scale_factor.is_finite()) {
            return Err(PipelineError::config(format!(
                "scale_factor must be greater than 1.0, got {}",
                d.scale_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.rotation_angle) {
            return Err(PipelineError::config(format!(
                "rotation_angle must be between 0.0 and 1.0, got {}",
                self.rotation_angle
            )));
        }
        if !(self.cluster_overlap_threshold > 0.0 && self.cluster_overlap_threshold <= 1.0) {
            return Err(PipelineError::config(format!(
                "cluster_overlap_threshold must be in (0.0, 1.0], got {}",
                self.cluster_overlap_threshold
            )));
        }
        if !(self.quality_threshold > 0.0 && self.quality_threshold.is_finite()) {
            return Err(PipelineError::config(format!(
                "quality_threshold must be positive, got {}",
                self.quality_threshold
            )));
        }
        Ok(())
    }

    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let json = fs::read_to_string(path).map_err(|e| {
            PipelineError::config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            PipelineError::config(format!("cannot parse {}: {e}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `<config_dir>/facemark/pipeline.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, PipelineError> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            _ => Ok(Self::default()),
        }
    }
}
