use serde::{Deserialize, Serialize};

/// A face found by the face detector: center, size and confidence.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceDetection {
    pub row: f64,
    pub col: f64,
    pub scale: f64,
    pub score: f64,
}

impl FaceDetection {
    pub fn new(row: f64, col: f64, scale: f64, score: f64) -> Self {
        Self {
            row,
            col,
            scale,
            score,
        }
    }

    /// Quality gate: only faces scoring strictly above the threshold are refined.
    pub fn passes_quality_gate(&self, threshold: f64) -> bool {
        self.score > threshold
    }

    /// Square bounding box `[x1, y1, x2, y2]` centered on the detection.
    pub fn bbox(&self) -> [f64; 4] {
        let half = self.scale / 2.0;
        [
            self.col - half,
            self.row - half,
            self.col + half,
            self.row + half,
        ]
    }
}
