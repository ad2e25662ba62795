use std::sync::Arc;

use crate::detection::domain::landmark_catalog::LandmarkCatalog;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::detection::domain::landmark_point::LandmarkEstimate;
use crate::detection::domain::pupil::PupilEstimate;
use crate::detection::infrastructure::classifier_recording::ClassifierRecording;
use crate::shared::error::{PipelineError, PortError};
use crate::shared::gray_image::ImageParams;

/// One recorded detector of a landmark group.
pub struct ReplayLandmarkDetector {
    recording: Arc<ClassifierRecording>,
    group: String,
    index: usize,
}

impl ReplayLandmarkDetector {
    pub fn new(recording: Arc<ClassifierRecording>, group: &str, index: usize) -> Self {
        Self {
            recording,
            group: group.to_string(),
            index,
        }
    }
}

impl LandmarkDetector for ReplayLandmarkDetector {
    fn locate(
        &self,
        left_pupil: &PupilEstimate,
        _right_pupil: &PupilEstimate,
        _image: &ImageParams<'_>,
        _perturb_count: u32,
        flipped: bool,
    ) -> Result<LandmarkEstimate, PortError> {
        Ok(self
            .recording
            .landmark_for(&self.group, self.index, flipped, left_pupil)
            .unwrap_or_else(LandmarkEstimate::not_found))
    }
}

/// Standard catalog backed by a recording.
///
/// Every group gets as many detectors as the recording references, and at
/// least one so that the terminal refinement always has a target.
pub fn replay_catalog(
    recording: &Arc<ClassifierRecording>,
) -> Result<LandmarkCatalog, PipelineError> {
    let mut catalog = LandmarkCatalog::standard();
    let names: Vec<String> = catalog.group_names().map(str::to_string).collect();
    for name in names {
        let count = recording.detector_count(&name).max(1);
        for index in 0..count {
            catalog.register(
                &name,
                Box::new(ReplayLandmarkDetector::new(recording.clone(), &name, index)),
            )?;
        }
    }
    Ok(catalog)
}
