//! Sleep feedback analysis
//!
//! Turns a post-playback sensor reading into the free-text feedback that the
//! next prompt is adjusted with. Rules are checked in order, first match wins.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::sensor::SensorReading;
use crate::state::SleepStage;

/// Outcome of analyzing a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feedback {
    /// Deep sleep with a low heart rate; the session can end
    DeepSleep,
    StillAnxious,
    Restless,
    Continue,
}

impl Feedback {
    /// Human-readable text carried into the next prompt
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeepSleep => "User is in deep sleep, fade out music.",
            Self::StillAnxious => "User remains anxious, use even slower tempo and softer sounds.",
            Self::Restless => "User is restless, try more calming music.",
            Self::Continue => "Continue current strategy.",
        }
    }

    pub fn is_deep_sleep(&self) -> bool {
        matches!(self, Self::DeepSleep)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Thresholds for the feedback rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackRules {
    /// Deep sleep only counts below this heart rate
    #[serde(rename = "deep-sleep-heart-rate")]
    pub deep_sleep_heart_rate: f64,

    /// Anxiety strictly above this level is reported
    #[serde(rename = "anxiety-threshold")]
    pub anxiety_threshold: u8,

    /// Movement strictly above this is reported as restlessness
    #[serde(rename = "restless-movement")]
    pub restless_movement: f64,
}

impl Default for FeedbackRules {
    fn default() -> Self {
        Self {
            deep_sleep_heart_rate: 60.0,
            anxiety_threshold: 7,
            restless_movement: 0.5,
        }
    }
}

impl FeedbackRules {
    /// Classify a reading
    pub fn analyze(&self, reading: &SensorReading) -> Feedback {
        debug!(?reading, "FeedbackRules::analyze: called");
        if reading.sleep_stage == SleepStage::Deep && reading.heart_rate < self.deep_sleep_heart_rate {
            debug!("FeedbackRules::analyze: deep sleep");
            Feedback::DeepSleep
        } else if reading.anxiety_level > self.anxiety_threshold {
            debug!("FeedbackRules::analyze: still anxious");
            Feedback::StillAnxious
        } else if reading.movement > self.restless_movement {
            debug!("FeedbackRules::analyze: restless");
            Feedback::Restless
        } else {
            debug!("FeedbackRules::analyze: continue");
            Feedback::Continue
        }
    }
}
