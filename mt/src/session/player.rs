//! Playback collaborator

use colored::*;
use tracing::{info, warn};

use crate::generation::AUDIO_NOT_AVAILABLE;

/// Plays an audio reference; side effect only
pub trait Player: Send + Sync {
    fn play(&self, audio_ref: &str);
}

/// Announces playback on stdout instead of driving a real device
#[derive(Debug, Clone, Default)]
pub struct ConsolePlayer;

impl Player for ConsolePlayer {
    fn play(&self, audio_ref: &str) {
        if audio_ref == AUDIO_NOT_AVAILABLE {
            warn!("Nothing to play, generation returned no audio reference");
        } else {
            info!("Playing {}", audio_ref);
        }
        println!("Playing music: {}", audio_ref.cyan());
    }
}
