//! Sensor collaborators
//!
//! A sensor source hands the session driver one fixed-shape physiological
//! reading per call. No real device is integrated: readings are either the
//! fixed simulated sample or replayed from a file.

mod error;
mod scripted;
mod simulated;

pub use error::SensorError;
pub use scripted::ScriptedSensor;
pub use simulated::SimulatedSensor;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::state::SleepStage;

/// Valid anxiety scale
pub const ANXIETY_RANGE: RangeInclusive<u8> = 1..=10;

/// Raw reading from the wearable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Beats per minute
    pub heart_rate: f64,
    /// Heart-rate variability in milliseconds
    pub hrv: f64,
    pub sleep_stage: SleepStage,
    /// Movement magnitude (g-force or similar)
    pub movement: f64,
    /// 1-10 scale
    pub anxiety_level: u8,
    #[serde(default)]
    pub user_preference: String,
}

impl SensorReading {
    pub fn anxiety_in_range(&self) -> bool {
        ANXIETY_RANGE.contains(&self.anxiety_level)
    }
}

/// Source of sensor readings
pub trait SensorSource: Send + Sync {
    /// Take the next reading
    fn read(&self) -> SensorReading;
}
