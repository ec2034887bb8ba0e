//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

use super::ScenarioKey;

pub const GENERAL_SLEEP: &str = include_str!("../../prompts/general_sleep.pmt");

pub const ANXIETY_INSOMNIA: &str = include_str!("../../prompts/anxiety_insomnia.pmt");

pub const DEEP_SLEEP: &str = include_str!("../../prompts/deep_sleep.pmt");

pub const PTSD_HYPERAROUSAL: &str = include_str!("../../prompts/ptsd_hyperarousal.pmt");

pub const SENSORY_FATIGUE: &str = include_str!("../../prompts/sensory_fatigue.pmt");

pub const CHILD_SLEEP_AID: &str = include_str!("../../prompts/child_sleep_aid.pmt");

/// Get the embedded template text for a scenario
pub fn get_embedded(key: ScenarioKey) -> &'static str {
    debug!(%key, "get_embedded: called");
    match key {
        ScenarioKey::GeneralSleep => GENERAL_SLEEP,
        ScenarioKey::AnxietyInsomnia => ANXIETY_INSOMNIA,
        ScenarioKey::DeepSleep => DEEP_SLEEP,
        ScenarioKey::PtsdHyperarousal => PTSD_HYPERAROUSAL,
        ScenarioKey::SensoryFatigue => SENSORY_FATIGUE,
        ScenarioKey::ChildSleepAid => CHILD_SLEEP_AID,
    }
}

/// Default variables for a scenario's placeholders
pub fn default_vars(key: ScenarioKey) -> &'static [(&'static str, &'static str)] {
    match key {
        ScenarioKey::GeneralSleep => &[("emotion", "calm, warm, and secure")],
        ScenarioKey::AnxietyInsomnia => &[("emotion", "calm, ground, and reassure")],
        _ => &[],
    }
}
