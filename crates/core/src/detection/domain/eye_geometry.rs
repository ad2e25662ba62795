//! Pupil search windows derived from a face detection.
//!
//! Eyes sit slightly above the face center and symmetrically outward from
//! it. The ratios match the coordinate convention the pupil cascade was
//! trained on and must not change.

use serde::{Deserialize, Serialize};

use crate::detection::domain::face_detection::FaceDetection;
use crate::detection::domain::pupil::SeedWindow;
use crate::shared::constants::{
    EYE_COL_OFFSET_RATIO, EYE_ROW_OFFSET_RATIO, EYE_SCALE_RATIO, PERTURB_BUDGET,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    pub const BOTH: [EyeSide; 2] = [EyeSide::Left, EyeSide::Right];

    fn col_sign(self) -> f64 {
        match self {
            EyeSide::Left => -1.0,
            EyeSide::Right => 1.0,
        }
    }
}

/// Seed window for one eye, computed only from `face`.
///
/// Values may go negative near image borders; validity is judged on the
/// locator's answer, not here.
pub fn derive_eye_seed(face: &FaceDetection, side: EyeSide) -> SeedWindow {
    SeedWindow {
        row: face.row - EYE_ROW_OFFSET_RATIO * face.scale,
        col: face.col + side.col_sign() * EYE_COL_OFFSET_RATIO * face.scale,
        scale: face.scale * EYE_SCALE_RATIO,
        perturb_count: PERTURB_BUDGET,
    }
}
