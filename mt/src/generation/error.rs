//! Generation error types

use thiserror::Error;

/// Errors that can occur while requesting generated music
///
/// Every variant is fatal to the session that hit it; there is no retry.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Generation returned no tracks")]
    EmptyResponse,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// HTTP status for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            GenerationError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
