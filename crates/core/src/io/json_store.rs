use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::detection::infrastructure::classifier_recording::ClassifierRecording;
use crate::io::io_error::IoError;
use crate::pipeline::result_aggregator::DetectionResult;

pub fn write_results(path: &Path, results: &[DetectionResult]) -> Result<(), IoError> {
    write_json(path, &results)
}

pub fn read_results(path: &Path) -> Result<Vec<DetectionResult>, IoError> {
    read_json(path)
}

pub fn write_recording(path: &Path, recording: &ClassifierRecording) -> Result<(), IoError> {
    write_json(path, recording)
}

pub fn read_recording(path: &Path) -> Result<ClassifierRecording, IoError> {
    read_json(path)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, IoError> {
    let contents = std::fs::read_to_string(path).map_err(|e| IoError::read(path, e))?;
    serde_json::from_str(&contents).map_err(|e| IoError::json(path, e))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| IoError::write(path, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| IoError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| IoError::write(path, e))
}
