use std::sync::Arc;

use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::face_detector::{DetectionParams, FaceDetector};
use crate::detection::infrastructure::classifier_recording::ClassifierRecording;
use crate::detection::infrastructure::overlap::cluster_detections;
use crate::shared::error::PortError;
use crate::shared::gray_image::ImageParams;

/// Replays recorded face candidates instead of scanning the image.
///
/// Candidates outside the `[min_size, max_size]` window are dropped, as a
/// cascade scan with the same parameters would never have produced them.
pub struct ReplayFaceDetector {
    recording: Arc<ClassifierRecording>,
}

impl ReplayFaceDetector {
    pub fn new(recording: Arc<ClassifierRecording>) -> Self {
        Self { recording }
    }
}

impl FaceDetector for ReplayFaceDetector {
    fn detect(
        &self,
        _image: &ImageParams<'_>,
        params: &DetectionParams,
        _angle: f64,
    ) -> Result<Vec<FaceDetection>, PortError> {
        let min = params.min_size as f64;
        let max = params.max_size as f64;
        Ok(self
            .recording
            .faces
            .iter()
            .filter(|f| f.scale >= min && f.scale <= max)
            .copied()
            .collect())
    }

    fn cluster(
        &self,
        detections: Vec<FaceDetection>,
        overlap_threshold: f64,
    ) -> Result<Vec<FaceDetection>, PortError> {
        Ok(cluster_detections(&detections, overlap_threshold))
    }
}
