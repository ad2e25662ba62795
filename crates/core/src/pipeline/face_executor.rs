use crate::detection::domain::face_detection::FaceDetection;
use crate::pipeline::result_aggregator::DetectionResult;
use crate::shared::error::PipelineError;

/// Per-face refinement work: pupil localization followed by landmark refinement.
pub type FaceJob<'a> = dyn Fn(&FaceDetection) -> Result<DetectionResult, PipelineError> + Sync + 'a;

/// Abstracts how accepted faces are fanned out for refinement.
///
/// Implementations must return exactly one outcome per input face, in input
/// order, whatever order the work actually ran in.
pub trait FaceExecutor: Send {
    fn execute(
        &self,
        faces: &[FaceDetection],
        job: &FaceJob<'_>,
    ) -> Vec<Result<DetectionResult, PipelineError>>;
}

/// Refines faces one after another on the calling thread.
pub struct SequentialFaceExecutor;

impl FaceExecutor for SequentialFaceExecutor {
    fn execute(
        &self,
        faces: &[FaceDetection],
        job: &FaceJob<'_>,
    ) -> Vec<Result<DetectionResult, PipelineError>> {
        faces.iter().map(job).collect()
    }
}
