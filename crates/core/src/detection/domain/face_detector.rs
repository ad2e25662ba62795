use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detection::FaceDetection;
use crate::shared::constants::{
    DEFAULT_MAX_SIZE, DEFAULT_MIN_SIZE, DEFAULT_SCALE_FACTOR, DEFAULT_SHIFT_FACTOR,
};
use crate::shared::error::PortError;
use crate::shared::gray_image::ImageParams;

/// Scanning parameters for the face cascade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionParams {
    pub min_size: u32,
    pub max_size: u32,
    pub shift_factor: f64,
    pub scale_factor: f64,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            shift_factor: DEFAULT_SHIFT_FACTOR,
            scale_factor: DEFAULT_SCALE_FACTOR,
        }
    }
}

/// Domain interface for the face cascade.
///
/// `angle` is the cascade rotation as a fraction of a full turn.
pub trait FaceDetector: Send + Sync {
    fn detect(
        &self,
        image: &ImageParams<'_>,
        params: &DetectionParams,
        angle: f64,
    ) -> Result<Vec<FaceDetection>, PortError>;

    /// Merges overlapping raw detections whose IoU exceeds `overlap_threshold`.
    fn cluster(
        &self,
        detections: Vec<FaceDetection>,
        overlap_threshold: f64,
    ) -> Result<Vec<FaceDetection>, PortError>;
}
