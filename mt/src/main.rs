//! mt - passive music therapy session runner
//!
//! CLI entry point for running sessions and inspecting prompts.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use musictherapy::cli::{Cli, Command};
use musictherapy::config::Config;
use musictherapy::prompts::{ScenarioKey, TemplateLibrary, select, synthesize};
use musictherapy::sensor::{ScriptedSensor, SensorSource, SimulatedSensor};
use musictherapy::session::{
    Collaborators, ConsolePlayer, JsonlRecorder, LogRecorder, SessionDriver, SessionEvent, SessionOutcome,
    SessionRecorder, read_records,
};
use musictherapy::state::UserState;
use musictherapy::{MusicGenerator, SunoClient};

fn parse_level(s: &str) -> Option<tracing::Level> {
    match s.to_uppercase().as_str() {
        "TRACE" => Some(tracing::Level::TRACE),
        "DEBUG" => Some(tracing::Level::DEBUG),
        "INFO" => Some(tracing::Level::INFO),
        "WARN" | "WARNING" => Some(tracing::Level::WARN),
        "ERROR" => Some(tracing::Level::ERROR),
        _ => None,
    }
}

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("musictherapy")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => parse_level(s).unwrap_or_else(|| {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
            tracing::Level::INFO
        }),
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("mt.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    if let Some(dir) = cli.prompts_dir {
        config.prompts_dir = Some(dir);
    }

    let library = match &config.prompts_dir {
        Some(dir) => TemplateLibrary::with_overrides(dir)?,
        None => TemplateLibrary::builtin(),
    };

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Run {
            iterations,
            base_url,
            delay_ms,
            readings,
            record,
        } => {
            if let Some(n) = iterations {
                config.session.iterations = n;
            }
            if let Some(url) = base_url {
                config.generation.base_url = url;
            }
            if let Some(ms) = delay_ms {
                config.session.playback_delay_ms = ms;
            }
            if let Some(path) = record {
                config.session.record_path = Some(path);
            }
            cmd_run(&config, &library, readings).await
        }
        Command::Prompt {
            reading,
            scenario,
            feedback,
            vars,
        } => cmd_prompt(&library, reading, scenario, feedback, vars),
        Command::Scenarios => {
            cmd_scenarios(&library);
            Ok(())
        }
        Command::History { path, limit } => cmd_history(&config, path, limit),
    }
}

/// Run the session loop against the configured generation API
async fn cmd_run(config: &Config, library: &TemplateLibrary, readings: Option<PathBuf>) -> Result<()> {
    debug!(?readings, "cmd_run: called");
    let sensor: Arc<dyn SensorSource> = match readings {
        Some(path) => Arc::new(ScriptedSensor::from_file(&path)?),
        None => Arc::new(SimulatedSensor::new()),
    };
    let recorder: Arc<dyn SessionRecorder> = match &config.session.record_path {
        Some(path) => Arc::new(JsonlRecorder::open(path)?),
        None => Arc::new(LogRecorder),
    };
    let generator: Arc<dyn MusicGenerator> = Arc::new(SunoClient::from_config(&config.generation)?);

    info!("Generation endpoint: {}", config.generation.base_url);
    let collaborators = Collaborators {
        sensor,
        generator,
        player: Arc::new(ConsolePlayer),
        recorder,
    };

    let driver = SessionDriver::with_config(library, collaborators, &config.session, config.feedback.clone())
        .on_event(print_event);
    let summary = driver.run().await;

    match summary.outcome {
        SessionOutcome::GenerationFailed { iteration, error } => {
            Err(eyre!("Music generation failed in session {}: {}", iteration, error))
        }
        _ => Ok(()),
    }
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::IterationStarted { iteration } => {
            println!("\n{}", format!("--- Session {} ---", iteration).bold());
        }
        SessionEvent::PromptReady { scenario, prompt, .. } => {
            println!("{} {}", "Scenario:".dimmed(), scenario.to_string().yellow());
            println!("{} {}", "Prompt:".green(), prompt);
        }
        SessionEvent::FeedbackReady { feedback, .. } => {
            println!("{} {}", "Feedback:".green(), feedback);
        }
        SessionEvent::Finished { outcome } => match outcome {
            SessionOutcome::Asleep { .. } => println!("{}", "User asleep, stopping music.".cyan()),
            // Reported once by cmd_run's error
            SessionOutcome::GenerationFailed { .. } => {}
            SessionOutcome::Completed => println!("{}", "All sessions completed.".dimmed()),
        },
    }
}

/// Synthesize and print a single prompt, no network involved
fn cmd_prompt(
    library: &TemplateLibrary,
    reading: Option<PathBuf>,
    scenario: Option<ScenarioKey>,
    feedback: Option<String>,
    vars: Vec<(String, String)>,
) -> Result<()> {
    debug!(?reading, ?scenario, "cmd_prompt: called");
    let reading = match reading {
        Some(path) => ScriptedSensor::from_file(&path)
            .context(format!("Failed to load reading from {}", path.display()))?
            .read(),
        None => SimulatedSensor::sample(),
    };
    let state = UserState::from_reading(&reading);
    let key = scenario.unwrap_or_else(|| select(&state));
    let extra: BTreeMap<String, String> = vars.into_iter().collect();
    let extra = (!extra.is_empty()).then_some(&extra);

    let prompt = synthesize(library.entry(key), &state, feedback.as_deref(), extra);
    eprintln!("{} {}", "Scenario:".dimmed(), key.to_string().yellow());
    println!("{}", prompt);
    Ok(())
}

fn cmd_scenarios(library: &TemplateLibrary) {
    for (key, entry) in library.iter() {
        println!("{}", key.to_string().cyan());
        if entry.defaults.is_empty() {
            println!("  {}", "(no default variables)".dimmed());
        }
        for (name, value) in &entry.defaults {
            println!("  {} = {}", name, value);
        }
    }
}

/// Print records from a JSONL session log, oldest first
fn cmd_history(config: &Config, path: Option<PathBuf>, limit: Option<usize>) -> Result<()> {
    debug!(?path, ?limit, "cmd_history: called");
    let path = path
        .or_else(|| config.session.record_path.clone())
        .ok_or_else(|| eyre!("No session log given and session.record-path is not configured"))?;
    if !path.exists() {
        return Err(eyre!("Session log not found: {}", path.display()));
    }

    let records = read_records(&path).context(format!("Failed to read session log {}", path.display()))?;
    if records.is_empty() {
        println!("{}", "No sessions recorded.".dimmed());
        return Ok(());
    }

    let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
    for record in &records[skip..] {
        println!(
            "{} {} {}",
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            format!("#{}", record.iteration).bold(),
            record.scenario.to_string().yellow()
        );
        println!(
            "  music_id={} audio_url={}",
            record.music_id.as_deref().unwrap_or("-"),
            record.audio_url
        );
        println!("  {} {}", "Feedback:".green(), record.feedback);
    }
    Ok(())
}
