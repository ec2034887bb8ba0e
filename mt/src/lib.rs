//! MusicTherapy - closed-loop passive music therapy demo
//!
//! Reads physiological signals, derives a user state, synthesizes a
//! natural-language prompt, asks an external service for generated music,
//! plays it, reads the listener's response and adapts the next prompt.
//!
//! # Modules
//!
//! - [`prompts`] - template library, scenario selector and prompt synthesizer
//! - [`state`] - user state built from a sensor reading
//! - [`sensor`] - sensor collaborators (simulated and scripted)
//! - [`feedback`] - post-playback feedback rules
//! - [`generation`] - music generation client
//! - [`session`] - session driver, playback and recording
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod feedback;
pub mod generation;
pub mod prompts;
pub mod sensor;
pub mod session;
pub mod state;

pub use config::{Config, GenerationConfig, SessionConfig};
pub use feedback::{Feedback, FeedbackRules};
pub use generation::{GeneratedTrack, GenerationError, MusicGenerator, SunoClient};
pub use prompts::{ScenarioKey, TemplateEntry, TemplateLibrary, select, synthesize};
pub use sensor::{ScriptedSensor, SensorReading, SensorSource, SimulatedSensor};
pub use session::{Collaborators, SessionDriver, SessionOutcome, SessionSummary};
pub use state::{SleepStage, UserState};
