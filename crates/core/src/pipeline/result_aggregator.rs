use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::landmark_point::{LandmarkEstimate, LandmarkPoint, PointKind};
use crate::detection::domain::pupil::PupilEstimate;

/// Everything found for one face, in traversal order.
///
/// Faces that failed the quality gate are reported with `accepted = false`
/// and carry no pupils or landmarks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub face: FaceDetection,
    pub accepted: bool,
    pub left_pupil: Option<PupilEstimate>,
    pub right_pupil: Option<PupilEstimate>,
    pub landmarks: Vec<LandmarkPoint>,
}

impl DetectionResult {
    pub fn rejected(face: FaceDetection) -> Self {
        Self {
            face,
            accepted: false,
            left_pupil: None,
            right_pupil: None,
            landmarks: Vec::new(),
        }
    }

    /// Face, valid pupils and landmarks flattened into one tagged sequence.
    ///
    /// Every point carries the face score.
    pub fn points(&self) -> Vec<LandmarkPoint> {
        let face = &self.face;
        let mut points = Vec::with_capacity(3 + self.landmarks.len());
        points.push(LandmarkPoint::new(
            face.row,
            face.col,
            face.scale,
            face.score,
            PointKind::Face,
        ));
        for pupil in [self.left_pupil, self.right_pupil].into_iter().flatten() {
            points.push(LandmarkPoint::new(
                pupil.row,
                pupil.col,
                pupil.scale,
                face.score,
                PointKind::Eye,
            ));
        }
        points.extend(self.landmarks.iter().copied());
        points
    }
}

/// Folds the stage outputs of one accepted face into a [`DetectionResult`].
///
/// Only estimates with strictly positive coordinates are kept.
pub struct FaceResultBuilder {
    result: DetectionResult,
}

impl FaceResultBuilder {
    pub fn new(face: FaceDetection) -> Self {
        Self {
            result: DetectionResult {
                accepted: true,
                ..DetectionResult::rejected(face)
            },
        }
    }

    pub fn pupils(&mut self, left: PupilEstimate, right: PupilEstimate) -> &mut Self {
        self.result.left_pupil = left.into_valid();
        self.result.right_pupil = right.into_valid();
        self
    }

    /// Appends the estimate if valid. Returns whether it was kept.
    pub fn push_landmark(&mut self, estimate: LandmarkEstimate) -> bool {
        match LandmarkPoint::from_estimate(estimate, self.result.face.score) {
            Some(point) => {
                self.result.landmarks.push(point);
                true
            }
            None => false,
        }
    }

    pub fn build(self) -> DetectionResult {
        self.result
    }
}

/// Merges refined results back into detection order.
///
/// `refined` holds one entry per face that passed the gate, in the same
/// order; `None` marks a face whose refinement was dropped, which removes
/// it from the output.
pub fn aggregate(
    faces: &[FaceDetection],
    quality_threshold: f64,
    refined: Vec<Option<DetectionResult>>,
) -> Vec<DetectionResult> {
    let mut refined = refined.into_iter();
    let mut results = Vec::with_capacity(faces.len());
    for face in faces {
        if face.passes_quality_gate(quality_threshold) {
            if let Some(Some(result)) = refined.next() {
                results.push(result);
            }
        } else {
            results.push(DetectionResult::rejected(*face));
        }
    }
    results
}
