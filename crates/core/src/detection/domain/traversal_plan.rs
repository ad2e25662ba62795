//! Declarative order in which landmark detectors are invoked for a face.

use crate::detection::domain::landmark_catalog::LandmarkCatalog;
use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::detection::domain::landmark_point::Orientation;
use crate::shared::constants::{EYE_GROUPS, MOUTH_GROUPS, TERMINAL_GROUP};
use crate::shared::error::PipelineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorSelection {
    /// Every detector of the group, in registration order.
    All,
    /// Only the first registered detector; the group must not be empty.
    First,
}

/// One step of the plan: which detectors of a group run, and in which
/// orientations. Each detector runs all its orientations before the next
/// detector starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalStep {
    pub group: String,
    pub selection: DetectorSelection,
    pub orientations: Vec<Orientation>,
}

impl TraversalStep {
    pub fn all(group: &str, orientations: &[Orientation]) -> Self {
        Self {
            group: group.to_string(),
            selection: DetectorSelection::All,
            orientations: orientations.to_vec(),
        }
    }

    pub fn first(group: &str, orientation: Orientation) -> Self {
        Self {
            group: group.to_string(),
            selection: DetectorSelection::First,
            orientations: vec![orientation],
        }
    }
}

/// A single resolved detector call.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub group: &'a str,
    pub detector_index: usize,
    pub detector: &'a dyn LandmarkDetector,
    pub orientation: Orientation,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraversalPlan {
    steps: Vec<TraversalStep>,
}

impl TraversalPlan {
    pub fn new(steps: Vec<TraversalStep>) -> Self {
        Self { steps }
    }

    /// Eye groups then mouth groups, each detector normal then flipped,
    /// closed by the first `lp84` detector in flipped orientation.
    pub fn standard() -> Self {
        let both = [Orientation::Normal, Orientation::Flipped];
        let mut steps: Vec<TraversalStep> = EYE_GROUPS
            .iter()
            .chain(MOUTH_GROUPS)
            .map(|group| TraversalStep::all(group, &both))
            .collect();
        steps.push(TraversalStep::first(TERMINAL_GROUP, Orientation::Flipped));
        Self::new(steps)
    }

    pub fn steps(&self) -> &[TraversalStep] {
        &self.steps
    }

    /// Resolves the plan against a catalog into the ordered call list.
    pub fn invocations<'a>(
        &self,
        catalog: &'a LandmarkCatalog,
    ) -> Result<Vec<Invocation<'a>>, PipelineError> {
        let mut calls = Vec::new();
        for step in &self.steps {
            let group = catalog.group(&step.group)?;
            let detectors = match step.selection {
                DetectorSelection::All => group.detectors(),
                DetectorSelection::First => {
                    if group.detectors().is_empty() {
                        return Err(PipelineError::config(format!(
                            "landmark group '{}' has no detectors",
                            step.group
                        )));
                    }
                    &group.detectors()[..1]
                }
            };
            for (detector_index, detector) in detectors.iter().enumerate() {
                for &orientation in &step.orientations {
                    calls.push(Invocation {
                        group: group.name(),
                        detector_index,
                        detector: detector.as_ref(),
                        orientation,
                    });
                }
            }
        }
        Ok(calls)
    }

    /// Checks that every step resolves against `catalog`.
    pub fn validate(&self, catalog: &LandmarkCatalog) -> Result<(), PipelineError> {
        self.invocations(catalog).map(|_| ())
    }
}

impl Default for TraversalPlan {
    fn default() -> Self {
        Self::standard()
    }
}
