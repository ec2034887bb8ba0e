//! Session recording - persists one record per completed iteration
//!
//! `JsonlRecorder` appends records to a JSONL file for later analysis;
//! `LogRecorder` only logs and prints them.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use colored::*;
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::prompts::ScenarioKey;
use crate::state::UserState;

/// Everything worth keeping about one iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub iteration: u32,
    pub scenario: ScenarioKey,
    pub user_state: UserState,
    pub prompt: String,
    pub music_id: Option<String>,
    pub audio_url: String,
    pub feedback: String,
}

/// Sink for session records
pub trait SessionRecorder: Send + Sync {
    fn record(&self, record: &SessionRecord) -> Result<()>;
}

/// Logs records and prints a one-line summary
#[derive(Debug, Clone, Default)]
pub struct LogRecorder;

impl SessionRecorder for LogRecorder {
    fn record(&self, record: &SessionRecord) -> Result<()> {
        info!(
            iteration = record.iteration,
            scenario = %record.scenario,
            music_id = ?record.music_id,
            audio_url = %record.audio_url,
            feedback = %record.feedback,
            "Session recorded"
        );
        println!(
            "{} iteration {} ({}) music_id={} audio_url={}",
            "Session recorded:".dimmed(),
            record.iteration,
            record.scenario,
            record.music_id.as_deref().unwrap_or("-"),
            record.audio_url
        );
        Ok(())
    }
}

/// Appends records as JSON lines
pub struct JsonlRecorder {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonlRecorder {
    /// Open (or create) the log file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!(?path, "JsonlRecorder::open: called");
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create session log directory")?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .context(format!("Failed to open session log {}", path.display()))?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionRecorder for JsonlRecorder {
    fn record(&self, record: &SessionRecord) -> Result<()> {
        debug!(iteration = record.iteration, path = ?self.path, "JsonlRecorder::record");
        let json = serde_json::to_string(record)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| eyre!("Session log writer lock poisoned"))?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read records back from a JSONL session log
///
/// Unparseable lines are skipped with a warning.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<SessionRecord>> {
    let path = path.as_ref();
    debug!(?path, "read_records: reading log file");

    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SessionRecord>(line) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(line, error = %e, "read_records: failed to parse line");
            }
        }
    }

    debug!(count = records.len(), "read_records: loaded records");
    Ok(records)
}
