use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::landmark_catalog::LandmarkCatalog;
use crate::detection::domain::pupil_locator::PupilLocator;
use crate::detection::domain::traversal_plan::TraversalPlan;
use crate::pipeline::pipeline_config::PipelineConfig;
use crate::shared::error::PipelineError;

/// Owns every collaborator the orchestrator needs.
///
/// Construction validates the configuration and resolves the traversal plan
/// against the catalog, so a context that exists can run.
pub struct PipelineContext {
    face_detector: Box<dyn FaceDetector>,
    pupil_locator: Box<dyn PupilLocator>,
    catalog: LandmarkCatalog,
    plan: TraversalPlan,
    config: PipelineConfig,
}

impl PipelineContext {
    pub fn new(
        face_detector: Box<dyn FaceDetector>,
        pupil_locator: Box<dyn PupilLocator>,
        catalog: LandmarkCatalog,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        Self::with_plan(
            face_detector,
            pupil_locator,
            catalog,
            TraversalPlan::standard(),
            config,
        )
    }

    pub fn with_plan(
        face_detector: Box<dyn FaceDetector>,
        pupil_locator: Box<dyn PupilLocator>,
        catalog: LandmarkCatalog,
        plan: TraversalPlan,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        plan.validate(&catalog)?;
        Ok(Self {
            face_detector,
            pupil_locator,
            catalog,
            plan,
            config,
        })
    }

    pub fn face_detector(&self) -> &dyn FaceDetector {
        self.face_detector.as_ref()
    }

    pub fn pupil_locator(&self) -> &dyn PupilLocator {
        self.pupil_locator.as_ref()
    }

    pub fn catalog(&self) -> &LandmarkCatalog {
        &self.catalog
    }

    pub fn plan(&self) -> &TraversalPlan {
        &self.plan
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }
}
