//! User state derived from a sensor reading
//!
//! A `UserState` is built fresh for every session iteration and never mutated
//! afterwards. Its fields are flattened into the same name-space as template
//! placeholders, so a placeholder only substitutes when its name matches a
//! field name exactly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sensor::SensorReading;

/// Sleep stage reported by the wearable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepStage {
    Awake,
    Light,
    Deep,
}

impl SleepStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Awake => "awake",
            Self::Light => "light",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for SleepStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SleepStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "awake" => Ok(Self::Awake),
            "light" => Ok(Self::Light),
            "deep" => Ok(Self::Deep),
            other => Err(format!("unknown sleep stage '{}' (expected awake, light or deep)", other)),
        }
    }
}

/// Per-iteration snapshot of the listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    /// Beats per minute
    pub heart_rate: f64,
    /// Heart-rate variability in milliseconds
    pub hrv: f64,
    pub sleep_stage: SleepStage,
    /// Self-reported or inferred anxiety, 1-10
    pub anxiety_level: u8,
    /// Free-text instrument preference, may be empty
    pub sound_preference: String,
}

impl UserState {
    /// Build the user state from a raw sensor reading
    pub fn from_reading(reading: &SensorReading) -> Self {
        debug!(?reading, "UserState::from_reading: called");
        if !reading.anxiety_in_range() {
            warn!(anxiety_level = reading.anxiety_level, "Anxiety level outside 1-10");
        }
        Self {
            heart_rate: reading.heart_rate,
            hrv: reading.hrv,
            sleep_stage: reading.sleep_stage,
            anxiety_level: reading.anxiety_level,
            sound_preference: reading.user_preference.clone(),
        }
    }

    /// Flatten every field into `(placeholder name, string value)` pairs
    pub fn variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("heart_rate", self.heart_rate.to_string()),
            ("hrv", self.hrv.to_string()),
            ("sleep_stage", self.sleep_stage.to_string()),
            ("anxiety_level", self.anxiety_level.to_string()),
            ("sound_preference", self.sound_preference.clone()),
        ]
    }
}
