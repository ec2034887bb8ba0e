//! Template Selector
//!
//! Maps a user state to a scenario. Rules are evaluated in order and the
//! first match wins; the ordering itself is part of the contract.

use tracing::debug;

use super::ScenarioKey;
use crate::state::{SleepStage, UserState};

/// Anxiety at or above this level selects the insomnia template
pub const ANXIETY_SCENARIO_LEVEL: u8 = 7;

/// Pick the scenario for a user state
///
/// `PtsdHyperarousal`, `SensoryFatigue` and `ChildSleepAid` are never
/// returned by these rules.
pub fn select(state: &UserState) -> ScenarioKey {
    debug!(anxiety_level = state.anxiety_level, sleep_stage = %state.sleep_stage, "select: called");
    if state.anxiety_level >= ANXIETY_SCENARIO_LEVEL {
        debug!("select: matched anxiety rule");
        ScenarioKey::AnxietyInsomnia
    } else if state.sleep_stage == SleepStage::Deep {
        debug!("select: matched deep sleep rule");
        ScenarioKey::DeepSleep
    } else {
        debug!("select: falling back to general sleep");
        ScenarioKey::GeneralSleep
    }
}
