use std::sync::Arc;

use crate::detection::domain::pupil::{PupilEstimate, SeedWindow};
use crate::detection::domain::pupil_locator::PupilLocator;
use crate::detection::infrastructure::classifier_recording::ClassifierRecording;
use crate::shared::error::PortError;
use crate::shared::gray_image::ImageParams;

/// Answers pupil queries from a recording; unknown seeds are "not found".
pub struct ReplayPupilLocator {
    recording: Arc<ClassifierRecording>,
}

impl ReplayPupilLocator {
    pub fn new(recording: Arc<ClassifierRecording>) -> Self {
        Self { recording }
    }
}

impl PupilLocator for ReplayPupilLocator {
    fn locate(
        &self,
        seed: &SeedWindow,
        _image: &ImageParams<'_>,
        _angle: f64,
        _flipped: bool,
    ) -> Result<PupilEstimate, PortError> {
        Ok(self
            .recording
            .pupil_for(seed)
            .unwrap_or_else(PupilEstimate::not_found))
    }
}
