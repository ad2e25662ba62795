//! Pre-computed classifier answers for one image.
//!
//! A recording stores what the face, pupil and landmark classifiers answered
//! on an image so that the pipeline can be replayed without cascade models.
//! Pupil answers are keyed by the seed window center; landmark answers by
//! group, detector index, orientation and the left pupil they were anchored
//! on. Coordinates match when they lie less than half a pixel apart.

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::landmark_point::LandmarkEstimate;
use crate::detection::domain::pupil::{PupilEstimate, SeedWindow};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PupilRecord {
    pub seed_row: f64,
    pub seed_col: f64,
    pub pupil: PupilEstimate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkRecord {
    pub group: String,
    pub detector: usize,
    pub flipped: bool,
    pub left_row: f64,
    pub left_col: f64,
    pub estimate: LandmarkEstimate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierRecording {
    /// Raw, unclustered face candidates.
    #[serde(default)]
    pub faces: Vec<FaceDetection>,
    #[serde(default)]
    pub pupils: Vec<PupilRecord>,
    #[serde(default)]
    pub landmarks: Vec<LandmarkRecord>,
}

const MATCH_TOLERANCE: f64 = 0.5;

fn same_pixel(a: f64, b: f64) -> bool {
    (a - b).abs() < MATCH_TOLERANCE
}

impl ClassifierRecording {
    pub fn pupil_for(&self, seed: &SeedWindow) -> Option<PupilEstimate> {
        self.pupils
            .iter()
            .find(|r| same_pixel(r.seed_row, seed.row) && same_pixel(r.seed_col, seed.col))
            .map(|r| r.pupil)
    }

    pub fn landmark_for(
        &self,
        group: &str,
        detector: usize,
        flipped: bool,
        left_pupil: &PupilEstimate,
    ) -> Option<LandmarkEstimate> {
        self.landmarks
            .iter()
            .find(|r| {
                r.group == group
                    && r.detector == detector
                    && r.flipped == flipped
                    && same_pixel(r.left_row, left_pupil.row)
                    && same_pixel(r.left_col, left_pupil.col)
            })
            .map(|r| r.estimate)
    }

    /// Number of detectors the recording implies for `group`.
    pub fn detector_count(&self, group: &str) -> usize {
        self.landmarks
            .iter()
            .filter(|r| r.group == group)
            .map(|r| r.detector + 1)
            .max()
            .unwrap_or(0)
    }
}
