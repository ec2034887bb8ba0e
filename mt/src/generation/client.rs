//! MusicGenerator trait definition

use async_trait::async_trait;

use super::{GeneratedTrack, GenerationError};

/// Stateless music generation client - each call is independent
#[async_trait]
pub trait MusicGenerator: Send + Sync {
    /// Request music for a prompt, returning the service's result records
    ///
    /// An `Ok` value always holds at least one track.
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedTrack>, GenerationError>;
}
