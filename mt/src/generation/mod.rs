//! Music generation module
//!
//! The generation service is an external collaborator: it takes a prompt and
//! returns track records. Failures are surfaced, never retried.

pub mod client;
mod error;
mod suno;
mod types;

pub use client::MusicGenerator;
pub use error::GenerationError;
pub use suno::{SunoClient, parse_tracks};
pub use types::{AUDIO_NOT_AVAILABLE, GenerateRequest, GeneratedTrack};
