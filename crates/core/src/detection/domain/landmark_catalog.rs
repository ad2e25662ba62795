use crate::detection::domain::landmark_detector::LandmarkDetector;
use crate::shared::constants::{EYE_GROUPS, MOUTH_GROUPS};
use crate::shared::error::PipelineError;

/// A named landmark group and its detectors in registration order.
pub struct LandmarkGroup {
    name: String,
    detectors: Vec<Box<dyn LandmarkDetector>>,
}

impl LandmarkGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn detectors(&self) -> &[Box<dyn LandmarkDetector>] {
        &self.detectors
    }
}

/// Static mapping from landmark group name to its ordered detectors.
///
/// Populated once at startup and read-only afterwards. A declared group may
/// hold zero detectors; looking up an undeclared group is a configuration
/// error.
#[derive(Default)]
pub struct LandmarkCatalog {
    groups: Vec<LandmarkGroup>,
}

impl LandmarkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with every eye and mouth group declared and empty.
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for name in EYE_GROUPS.iter().chain(MOUTH_GROUPS) {
            catalog.declare(name);
        }
        catalog
    }

    /// Declares a group. Declaring an existing group is a no-op.
    pub fn declare(&mut self, name: &str) -> &mut Self {
        if self.position(name).is_none() {
            self.groups.push(LandmarkGroup {
                name: name.to_string(),
                detectors: Vec::new(),
            });
        }
        self
    }

    /// Appends a detector to a declared group.
    pub fn register(
        &mut self,
        group: &str,
        detector: Box<dyn LandmarkDetector>,
    ) -> Result<(), PipelineError> {
        let idx = self
            .position(group)
            .ok_or_else(|| PipelineError::config(format!("unknown landmark group '{group}'")))?;
        self.groups[idx].detectors.push(detector);
        Ok(())
    }

    pub fn group(&self, name: &str) -> Result<&LandmarkGroup, PipelineError> {
        self.position(name)
            .map(|idx| &self.groups[idx])
            .ok_or_else(|| PipelineError::config(format!("unknown landmark group '{name}'")))
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|g| g.name.as_str())
    }

    pub fn detector_count(&self) -> usize {
        self.groups.iter().map(|g| g.detectors.len()).sum()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }
}
