//! Session module
//!
//! The driver loop plus the playback and recording collaborators it calls.

mod driver;
pub mod player;
pub mod recorder;

pub use driver::{Collaborators, IterationReport, SessionDriver, SessionEvent, SessionOutcome, SessionSummary};
pub use player::{ConsolePlayer, Player};
pub use recorder::{JsonlRecorder, LogRecorder, SessionRecord, SessionRecorder, read_records};
