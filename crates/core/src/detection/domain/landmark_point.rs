use serde::{Deserialize, Serialize};

/// Provenance of a point in an aggregated result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Face,
    Eye,
    Landmark,
}

/// Search direction of a landmark detector invocation.
///
/// `Flipped` mirrors the search, looking from the opposite eye's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Normal,
    Flipped,
}

impl Orientation {
    pub fn is_flipped(self) -> bool {
        self == Orientation::Flipped
    }
}

/// Raw answer from a landmark detector; non-positive coordinates mean "not found".
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkEstimate {
    pub row: f64,
    pub col: f64,
    pub scale: f64,
}

impl LandmarkEstimate {
    pub fn new(row: f64, col: f64, scale: f64) -> Self {
        Self { row, col, scale }
    }

    pub fn not_found() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub fn is_valid(&self) -> bool {
        self.row > 0.0 && self.col > 0.0
    }
}

/// A located point tagged with the score of its face and its provenance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub row: f64,
    pub col: f64,
    pub scale: f64,
    pub score: f64,
    pub kind: PointKind,
}

impl LandmarkPoint {
    pub fn new(row: f64, col: f64, scale: f64, score: f64, kind: PointKind) -> Self {
        Self {
            row,
            col,
            scale,
            score,
            kind,
        }
    }

    /// Promotes a raw estimate to a point, or `None` when it was not found.
    pub fn from_estimate(estimate: LandmarkEstimate, score: f64) -> Option<Self> {
        estimate.is_valid().then(|| {
            Self::new(
                estimate.row,
                estimate.col,
                estimate.scale,
                score,
                PointKind::Landmark,
            )
        })
    }
}
