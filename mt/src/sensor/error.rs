//! Sensor error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading recorded sensor readings
#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse readings in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("No readings found in {0}")]
    Empty(PathBuf),

    #[error("Reading {index} in {path} has anxiety_level {value}, expected 1-10")]
    AnxietyOutOfRange { path: PathBuf, index: usize, value: u8 },
}
