use std::fmt;

use thiserror::Error;

/// Error type returned by classifier port implementations.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;

/// Identifies which classifier port failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassifierPort {
    FaceDetector,
    PupilLocator,
    LandmarkDetector { group: String },
}

impl fmt::Display for ClassifierPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierPort::FaceDetector => write!(f, "face detector"),
            ClassifierPort::PupilLocator => write!(f, "pupil locator"),
            ClassifierPort::LandmarkDetector { group } => {
                write!(f, "landmark detector '{group}'")
            }
        }
    }
}

/// Fatal pipeline errors. Any of these aborts the whole image.
///
/// "Not found" outcomes from classifiers are not errors; they surface as
/// missing pupils or landmarks in the result.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("{port} unavailable: {source}")]
    ClassifierUnavailable {
        port: ClassifierPort,
        #[source]
        source: PortError,
    },
    #[error("invalid image: {0}")]
    InvalidImage(String),
    #[error("face worker failed: {0}")]
    Worker(String),
}

impl PipelineError {
    pub fn config(message: impl Into<String>) -> Self {
        PipelineError::Configuration(message.into())
    }

    pub fn classifier(port: ClassifierPort, source: PortError) -> Self {
        PipelineError::ClassifierUnavailable { port, source }
    }
}
