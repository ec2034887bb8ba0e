//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::feedback::FeedbackRules;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Directory with `{scenario}.pmt` template overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,

    /// Music generation service
    pub generation: GenerationConfig,

    /// Session loop settings
    pub session: SessionConfig,

    /// Feedback rule thresholds
    pub feedback: FeedbackRules,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: musictherapy.yml
        let local_config = PathBuf::from("musictherapy.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/musictherapy/musictherapy.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => [Some(PathBuf::from("musictherapy.yml")), Self::user_config_path()]
                .into_iter()
                .flatten()
                .collect(),
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("musictherapy").join("musictherapy.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Music generation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Ask for music without vocals
    #[serde(rename = "make-instrumental")]
    pub make_instrumental: bool,

    /// Block until audio is ready instead of returning immediately
    #[serde(rename = "wait-audio")]
    pub wait_audio: bool,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            make_instrumental: true,
            wait_audio: true,
            timeout_ms: 300_000,
        }
    }
}

/// Session loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of music sessions per run
    pub iterations: u32,

    /// Simulated playback time before feedback is read
    #[serde(rename = "playback-delay-ms")]
    pub playback_delay_ms: u64,

    /// JSONL file that session records are appended to
    #[serde(rename = "record-path")]
    pub record_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            iterations: 3,
            playback_delay_ms: 2000,
            record_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.generation.base_url, "http://localhost:3000");
        assert!(config.generation.make_instrumental);
        assert!(config.generation.wait_audio);
        assert_eq!(config.session.iterations, 3);
        assert_eq!(config.session.playback_delay_ms, 2000);
        assert!(config.session.record_path.is_none());
        assert_eq!(config.feedback, FeedbackRules::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "generation:\n  base-url: http://suno.local:8080\nsession:\n  iterations: 5\nfeedback:\n  anxiety-threshold: 6\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.generation.base_url, "http://suno.local:8080");
        assert!(config.generation.wait_audio);
        assert_eq!(config.session.iterations, 5);
        assert_eq!(config.session.playback_delay_ms, 2000);
        assert_eq!(config.feedback.anxiety_threshold, 6);
        assert_eq!(config.feedback.restless_movement, 0.5);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mt.yml");
        fs::write(&path, "log-level: debug\nsession:\n  playback-delay-ms: 0\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.session.playback_delay_ms, 0);
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("debug"));
    }

    #[test]
    fn test_load_explicit_path_errors() {
        let missing = PathBuf::from("/nonexistent/mt.yml");
        assert!(Config::load(Some(&missing)).is_err());
        assert!(Config::load_log_level(Some(&missing)).is_none());

        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yml");
        fs::write(&path, "session: [not, a, map]\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
