//! Template Library
//!
//! Maps each therapeutic scenario to its template text and default variables.
//! The library is built once at startup and only read afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::embedded;

/// Identifier of a therapeutic scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKey {
    GeneralSleep,
    AnxietyInsomnia,
    DeepSleep,
    /// Not chosen by the selector rules yet
    PtsdHyperarousal,
    /// Not chosen by the selector rules yet
    SensoryFatigue,
    /// Not chosen by the selector rules yet
    ChildSleepAid,
}

impl ScenarioKey {
    /// Every scenario, in declaration order
    pub const ALL: [ScenarioKey; 6] = [
        Self::GeneralSleep,
        Self::AnxietyInsomnia,
        Self::DeepSleep,
        Self::PtsdHyperarousal,
        Self::SensoryFatigue,
        Self::ChildSleepAid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralSleep => "general_sleep",
            Self::AnxietyInsomnia => "anxiety_insomnia",
            Self::DeepSleep => "deep_sleep",
            Self::PtsdHyperarousal => "ptsd_hyperarousal",
            Self::SensoryFatigue => "sensory_fatigue",
            Self::ChildSleepAid => "child_sleep_aid",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown scenario '{}' (known: {})", s, known.join(", "))
            })
    }
}

/// Template text plus defaults for placeholders that vary by intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Text with `{name}` placeholders
    pub template: String,
    /// Values for placeholders not supplied by the user state
    pub defaults: BTreeMap<String, String>,
}

impl TemplateEntry {
    pub fn new(template: impl Into<String>, defaults: BTreeMap<String, String>) -> Self {
        Self {
            template: template.into(),
            defaults,
        }
    }

    fn builtin(key: ScenarioKey) -> Self {
        let defaults = embedded::default_vars(key)
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self::new(embedded::get_embedded(key).trim_end(), defaults)
    }
}

/// Scenario key to template entry, one entry per key
#[derive(Debug, Clone)]
pub struct TemplateLibrary {
    entries: [TemplateEntry; ScenarioKey::ALL.len()],
}

impl Default for TemplateLibrary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateLibrary {
    /// Library made of the embedded templates
    pub fn builtin() -> Self {
        debug!("TemplateLibrary::builtin: called");
        Self {
            entries: ScenarioKey::ALL.map(TemplateEntry::builtin),
        }
    }

    /// Library with template texts overridden from `{dir}/{key}.pmt`
    ///
    /// Scenarios without an override file keep the embedded text. Default
    /// variables always come from the embedded table.
    pub fn with_overrides(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        debug!(?dir, "TemplateLibrary::with_overrides: called");
        if !dir.is_dir() {
            return Err(eyre!("Prompt override directory not found: {}", dir.display()));
        }

        let mut library = Self::builtin();
        for key in ScenarioKey::ALL {
            let path = dir.join(format!("{}.pmt", key));
            if path.exists() {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e))?;
                info!("Using prompt override for {} from {}", key, path.display());
                library.entries[key.index()].template = text.trim_end().to_string();
            } else {
                debug!(?path, "TemplateLibrary::with_overrides: no override");
            }
        }
        Ok(library)
    }

    /// Entry for a scenario; never fails
    pub fn entry(&self, key: ScenarioKey) -> &TemplateEntry {
        &self.entries[key.index()]
    }

    /// Entry by string key
    pub fn get(&self, name: &str) -> Option<&TemplateEntry> {
        debug!(%name, "TemplateLibrary::get: called");
        name.parse::<ScenarioKey>().ok().map(|key| self.entry(key))
    }

    pub fn keys(&self) -> impl Iterator<Item = ScenarioKey> {
        ScenarioKey::ALL.into_iter()
    }

    /// All keys with their entries, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioKey, &TemplateEntry)> {
        ScenarioKey::ALL.into_iter().zip(self.entries.iter())
    }
}
