use serde::{Deserialize, Serialize};

/// Search window handed to the pupil locator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedWindow {
    pub row: f64,
    pub col: f64,
    pub scale: f64,
    pub perturb_count: u32,
}

impl SeedWindow {
    pub fn new(row: f64, col: f64, scale: f64, perturb_count: u32) -> Self {
        Self {
            row,
            col,
            scale,
            perturb_count,
        }
    }
}

/// Raw pupil answer from the pupil locator.
///
/// The locator reports "not found" with a non-positive coordinate. Use
/// [`PupilEstimate::into_valid`] to turn that convention into an `Option`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PupilEstimate {
    pub row: f64,
    pub col: f64,
    pub scale: f64,
    pub perturb_count: u32,
}

impl PupilEstimate {
    pub fn new(row: f64, col: f64, scale: f64, perturb_count: u32) -> Self {
        Self {
            row,
            col,
            scale,
            perturb_count,
        }
    }

    /// Sentinel estimate meaning "no pupil found".
    pub fn not_found() -> Self {
        Self::new(0.0, 0.0, 0.0, 0)
    }

    pub fn is_valid(&self) -> bool {
        self.row > 0.0 && self.col > 0.0
    }

    pub fn into_valid(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }
}
