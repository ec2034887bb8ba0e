//! Fixed simulated wearable

use tracing::debug;

use super::{SensorReading, SensorSource};
use crate::state::SleepStage;

/// Returns the same light-sleep sample on every read
#[derive(Debug, Clone, Default)]
pub struct SimulatedSensor;

impl SimulatedSensor {
    pub fn new() -> Self {
        Self
    }

    /// The fixed sample every read returns
    pub fn sample() -> SensorReading {
        SensorReading {
            heart_rate: 68.0,
            hrv: 45.0,
            sleep_stage: SleepStage::Light,
            movement: 0.1,
            anxiety_level: 6,
            user_preference: "piano, ambient".to_string(),
        }
    }
}

impl SensorSource for SimulatedSensor {
    fn read(&self) -> SensorReading {
        debug!("SimulatedSensor::read: called");
        Self::sample()
    }
}
