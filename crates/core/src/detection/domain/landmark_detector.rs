use crate::detection::domain::landmark_point::LandmarkEstimate;
use crate::detection::domain::pupil::PupilEstimate;
use crate::shared::error::PortError;
use crate::shared::gray_image::ImageParams;

/// Domain interface for one facial landmark cascade.
///
/// Anchored on the raw pupil pair, which may hold "not found" sentinels.
pub trait LandmarkDetector: Send + Sync {
    fn locate(
        &self,
        left_pupil: &PupilEstimate,
        right_pupil: &PupilEstimate,
        image: &ImageParams<'_>,
        perturb_count: u32,
        flipped: bool,
    ) -> Result<LandmarkEstimate, PortError>;
}
