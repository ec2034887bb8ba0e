//! CLI argument parsing for mt

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::prompts::ScenarioKey;

#[derive(Parser, Debug)]
#[command(name = "mt")]
#[command(author, version, about = "Closed-loop passive music therapy demo", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Directory with `{scenario}.pmt` template overrides
    #[arg(long, global = true)]
    pub prompts_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the adaptive music session loop
    Run {
        /// Maximum number of music sessions (default: 3)
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        /// Base URL of the music generation API
        #[arg(long, env = "MT_BASE_URL")]
        base_url: Option<String>,

        /// Simulated playback time in milliseconds (default: 2000)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// YAML/JSON list of sensor readings to replay instead of the simulated wearable
        #[arg(short, long)]
        readings: Option<PathBuf>,

        /// Append session records to this JSONL file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Print the prompt for a reading without calling the generation API
    Prompt {
        /// YAML/JSON file with sensor readings (the first one is used)
        #[arg(short, long)]
        reading: Option<PathBuf>,

        /// Force a scenario instead of selecting one from the reading
        #[arg(short, long)]
        scenario: Option<ScenarioKey>,

        /// Feedback from a previous session
        #[arg(short, long)]
        feedback: Option<String>,

        /// Extra template variable, highest precedence (repeatable)
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },

    /// List scenarios and their default variables
    Scenarios,

    /// Show iterations recorded in a JSONL session log
    History {
        /// Session log to read (default: session.record-path from config)
        path: Option<PathBuf>,

        /// Only show the most recent N records
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
}

/// Parse a `NAME=VALUE` pair
pub fn parse_var(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty variable name in '{}'", s));
    }
    Ok((name.to_string(), value.to_string()))
}
