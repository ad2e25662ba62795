use crate::detection::domain::pupil::{PupilEstimate, SeedWindow};
use crate::shared::error::PortError;
use crate::shared::gray_image::ImageParams;

/// Domain interface for the pupil localization cascade.
///
/// Returns a non-positive coordinate when no pupil is found in the window.
/// Implementations are shared across faces, so any scratch state must be
/// per call.
pub trait PupilLocator: Send + Sync {
    fn locate(
        &self,
        seed: &SeedWindow,
        image: &ImageParams<'_>,
        angle: f64,
        flipped: bool,
    ) -> Result<PupilEstimate, PortError>;
}
