//! End-to-end session tests against in-process collaborators

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use musictherapy::generation::{GeneratedTrack, GenerationError, MusicGenerator};
use musictherapy::sensor::{ScriptedSensor, SensorReading};
use musictherapy::session::{Collaborators, JsonlRecorder, Player, SessionDriver, SessionOutcome, read_records};
use musictherapy::{FeedbackRules, ScenarioKey, SessionConfig, SleepStage, TemplateLibrary};
use tempfile::TempDir;

/// Hands out numbered tracks and remembers the prompts it was given
#[derive(Default)]
struct NumberedGenerator {
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl MusicGenerator for NumberedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Vec<GeneratedTrack>, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(vec![GeneratedTrack {
            id: Some(format!("track-{}", n)),
            audio_url: Some(format!("https://cdn.example/track-{}.mp3", n)),
            ..Default::default()
        }])
    }
}

#[derive(Default)]
struct SilentPlayer {
    plays: AtomicUsize,
}

impl Player for SilentPlayer {
    fn play(&self, _audio_ref: &str) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

fn reading(stage: SleepStage, heart_rate: f64, anxiety_level: u8, movement: f64) -> SensorReading {
    SensorReading {
        heart_rate,
        hrv: 45.0,
        sleep_stage: stage,
        movement,
        anxiety_level,
        user_preference: "piano, ambient".to_string(),
    }
}

#[tokio::test]
async fn test_session_adapts_and_stops_on_deep_sleep() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let log_path = temp.path().join("sessions.jsonl");

    // Two reads per iteration: state, then post-playback feedback
    let sensor = ScriptedSensor::new(vec![
        reading(SleepStage::Awake, 80.0, 8, 0.2),
        reading(SleepStage::Awake, 78.0, 8, 0.2),
        reading(SleepStage::Light, 66.0, 5, 0.8),
        reading(SleepStage::Light, 64.0, 4, 0.8),
        reading(SleepStage::Deep, 58.0, 2, 0.0),
        reading(SleepStage::Deep, 55.0, 2, 0.0),
    ])
    .unwrap();

    let generator = Arc::new(NumberedGenerator::default());
    let player = Arc::new(SilentPlayer::default());
    let collaborators = Collaborators {
        sensor: Arc::new(sensor),
        generator: generator.clone(),
        player: player.clone(),
        recorder: Arc::new(JsonlRecorder::open(&log_path).unwrap()),
    };
    let config = SessionConfig {
        iterations: 5,
        playback_delay_ms: 0,
        record_path: Some(log_path.clone()),
    };

    let library = TemplateLibrary::builtin();
    let summary = SessionDriver::with_config(&library, collaborators, &config, FeedbackRules::default())
        .run()
        .await;

    assert_eq!(summary.outcome, SessionOutcome::Asleep { iteration: 3 });
    let scenarios: Vec<_> = summary.reports.iter().map(|r| r.scenario).collect();
    assert_eq!(
        scenarios,
        vec![ScenarioKey::AnxietyInsomnia, ScenarioKey::GeneralSleep, ScenarioKey::DeepSleep]
    );

    let prompts = generator.prompts.lock().unwrap().clone();
    assert!(prompts[0].contains("anxiety-driven insomnia"));
    assert!(!prompts[0].contains("Adjust according to feedback"));
    assert!(prompts[1].contains(
        "Adjust according to feedback: User remains anxious, use even slower tempo and softer sounds."
    ));
    assert!(prompts[2].contains("Adjust according to feedback: User is restless, try more calming music."));
    assert!(prompts[2].contains("Generate a music piece for deep sleep."));
    assert_eq!(player.plays.load(Ordering::SeqCst), 3);

    let records = read_records(&log_path).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].music_id.as_deref(), Some("track-1"));
    assert_eq!(records[2].audio_url, "https://cdn.example/track-3.mp3");
    assert_eq!(records[2].feedback, "User is in deep sleep, fade out music.");
    assert_eq!(records[1].user_state.sleep_stage, SleepStage::Light);
}
