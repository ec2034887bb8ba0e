//! SessionDriver - runs the closed music therapy loop
//!
//! Each iteration: sensor → user state → scenario → prompt → generation →
//! playback → feedback → record. Iterations run strictly one after another;
//! only the feedback text is carried into the next one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::{Player, SessionRecord, SessionRecorder};
use crate::config::SessionConfig;
use crate::feedback::{Feedback, FeedbackRules};
use crate::generation::{GenerationError, MusicGenerator};
use crate::prompts::{ScenarioKey, TemplateLibrary, select, synthesize};
use crate::sensor::SensorSource;
use crate::state::UserState;

/// External collaborators the driver calls into
#[derive(Clone)]
pub struct Collaborators {
    pub sensor: Arc<dyn SensorSource>,
    pub generator: Arc<dyn MusicGenerator>,
    pub player: Arc<dyn Player>,
    pub recorder: Arc<dyn SessionRecorder>,
}

/// Progress notifications emitted while the session runs
#[derive(Debug, Clone)]
pub enum SessionEvent {
    IterationStarted { iteration: u32 },
    PromptReady { iteration: u32, scenario: ScenarioKey, prompt: String },
    FeedbackReady { iteration: u32, feedback: Feedback },
    Finished { outcome: SessionOutcome },
}

/// What one completed iteration produced
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    pub iteration: u32,
    pub scenario: ScenarioKey,
    pub prompt: String,
    pub music_id: Option<String>,
    pub audio_ref: String,
    pub feedback: Feedback,
}

/// Why the session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Ran every iteration
    Completed,
    /// Stopped early once the listener fell asleep
    Asleep { iteration: u32 },
    /// Generation failed; the iteration was abandoned before playback
    GenerationFailed { iteration: u32, error: String },
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub reports: Vec<IterationReport>,
    pub outcome: SessionOutcome,
}

impl SessionSummary {
    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, SessionOutcome::GenerationFailed { .. })
    }
}

type Observer = Box<dyn Fn(&SessionEvent) + Send + Sync>;

/// Session loop driver
pub struct SessionDriver<'a> {
    library: &'a TemplateLibrary,
    collaborators: Collaborators,
    rules: FeedbackRules,
    iterations: u32,
    playback_delay: Duration,
    observer: Option<Observer>,
}

impl<'a> SessionDriver<'a> {
    pub fn with_config(
        library: &'a TemplateLibrary,
        collaborators: Collaborators,
        config: &SessionConfig,
        rules: FeedbackRules,
    ) -> Self {
        debug!(?config, ?rules, "SessionDriver::with_config: called");
        Self {
            library,
            collaborators,
            rules,
            iterations: config.iterations,
            playback_delay: Duration::from_millis(config.playback_delay_ms),
            observer: None,
        }
    }

    /// Receive progress events as they happen
    pub fn on_event(mut self, observer: impl Fn(&SessionEvent) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Run up to the configured number of iterations
    pub async fn run(&self) -> SessionSummary {
        info!("Starting session (max_iterations: {})", self.iterations);
        let mut reports = Vec::new();
        let mut last_feedback: Option<String> = None;
        let mut outcome = SessionOutcome::Completed;

        for iteration in 1..=self.iterations {
            info!("Session iteration {}/{}", iteration, self.iterations);
            self.emit(SessionEvent::IterationStarted { iteration });

            match self.run_iteration(iteration, last_feedback.as_deref()).await {
                Ok(report) => {
                    let feedback = report.feedback;
                    last_feedback = Some(feedback.message().to_string());
                    reports.push(report);
                    if feedback.is_deep_sleep() {
                        info!("Listener asleep after iteration {}, stopping", iteration);
                        outcome = SessionOutcome::Asleep { iteration };
                        break;
                    }
                }
                Err(e) => {
                    warn!(iteration, error = %e, "Music generation failed, stopping session");
                    outcome = SessionOutcome::GenerationFailed {
                        iteration,
                        error: e.to_string(),
                    };
                    break;
                }
            }
        }

        debug!(?outcome, completed = reports.len(), "run: finished");
        self.emit(SessionEvent::Finished {
            outcome: outcome.clone(),
        });
        SessionSummary { reports, outcome }
    }

    async fn run_iteration(&self, iteration: u32, last_feedback: Option<&str>) -> Result<IterationReport, GenerationError> {
        debug!(iteration, ?last_feedback, "run_iteration: called");
        let c = &self.collaborators;

        let reading = c.sensor.read();
        let state = UserState::from_reading(&reading);
        let scenario = select(&state);
        let prompt = synthesize(self.library.entry(scenario), &state, last_feedback, None);
        info!(%scenario, "Prompt synthesized ({} chars)", prompt.len());
        self.emit(SessionEvent::PromptReady {
            iteration,
            scenario,
            prompt: prompt.clone(),
        });

        let tracks = c.generator.generate(&prompt).await?;
        let track = tracks.into_iter().next().ok_or(GenerationError::EmptyResponse)?;
        if !track.has_audio() {
            warn!(iteration, music_id = ?track.id, "First track has no audio reference");
        }
        let audio_ref = track.audio_ref().to_string();

        c.player.play(&audio_ref);
        if !self.playback_delay.is_zero() {
            tokio::time::sleep(self.playback_delay).await;
        }

        let after = c.sensor.read();
        let feedback = self.rules.analyze(&after);
        info!(%feedback, "Feedback analyzed");
        self.emit(SessionEvent::FeedbackReady { iteration, feedback });

        let record = SessionRecord {
            timestamp: Utc::now(),
            iteration,
            scenario,
            user_state: state,
            prompt: prompt.clone(),
            music_id: track.id.clone(),
            audio_url: audio_ref.clone(),
            feedback: feedback.message().to_string(),
        };
        if let Err(e) = c.recorder.record(&record) {
            warn!(iteration, error = %e, "Failed to record session");
        }

        Ok(IterationReport {
            iteration,
            scenario,
            prompt,
            music_id: track.id,
            audio_ref,
            feedback,
        })
    }
}
