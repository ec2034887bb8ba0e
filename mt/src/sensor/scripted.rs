//! Sensor that replays recorded readings
//!
//! Readings are returned in file order. Once the script is exhausted the last
//! reading repeats, so a short script still drives a full session.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use super::{SensorError, SensorReading, SensorSource};

/// Replays a fixed list of readings
pub struct ScriptedSensor {
    readings: Vec<SensorReading>,
    cursor: AtomicUsize,
}

impl ScriptedSensor {
    /// Build from an in-memory list; `None` when the list is empty
    pub fn new(readings: Vec<SensorReading>) -> Option<Self> {
        debug!(count = readings.len(), "ScriptedSensor::new: called");
        if readings.is_empty() {
            return None;
        }
        Some(Self {
            readings,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Load readings from a `.json` file or a YAML list
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SensorError> {
        let path = path.as_ref();
        debug!(?path, "ScriptedSensor::from_file: called");
        let content = std::fs::read_to_string(path).map_err(|source| SensorError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let readings: Vec<SensorReading> = if is_json {
            serde_json::from_str(&content).map_err(|e| SensorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| SensorError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
        };

        if let Some((index, reading)) = readings.iter().enumerate().find(|(_, r)| !r.anxiety_in_range()) {
            return Err(SensorError::AnxietyOutOfRange {
                path: path.to_path_buf(),
                index,
                value: reading.anxiety_level,
            });
        }

        Self::new(readings).ok_or_else(|| SensorError::Empty(path.to_path_buf()))
    }

    /// Number of readings handed out so far
    pub fn reads(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl SensorSource for ScriptedSensor {
    fn read(&self) -> SensorReading {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        let idx = idx.min(self.readings.len() - 1);
        debug!(%idx, "ScriptedSensor::read: returning reading");
        self.readings[idx].clone()
    }
}
