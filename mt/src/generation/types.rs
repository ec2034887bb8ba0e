//! Generation request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audio reference used when the service returns a track without one
pub const AUDIO_NOT_AVAILABLE: &str = "N/A";

/// Body of a generation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub make_instrumental: bool,
    pub wait_audio: bool,
}

/// One result record from the generation service
///
/// Only `id` and `audio_url` matter to the session; the rest is kept for the
/// session record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedTrack {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl GeneratedTrack {
    /// Read a track out of an arbitrary JSON record
    ///
    /// Fields that are missing or not strings come back as `None`, so a
    /// malformed record still yields a track that plays `N/A`.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            id: field("id"),
            audio_url: field("audio_url"),
            title: field("title"),
            status: field("status"),
        }
    }

    /// Playable reference, or `N/A` when the service left it out
    pub fn audio_ref(&self) -> &str {
        match self.audio_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => AUDIO_NOT_AVAILABLE,
        }
    }

    pub fn has_audio(&self) -> bool {
        self.audio_ref() != AUDIO_NOT_AVAILABLE
    }
}
