//! Prompt Synthesizer
//!
//! Merges template defaults, user-state fields and caller variables, fills the
//! template's `{name}` placeholders, then appends the feedback and preference
//! clauses. Pure: no I/O, no hidden state.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::TemplateEntry;
use crate::state::UserState;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(.*?)\}").expect("placeholder pattern is a valid regex"));

/// Placeholder name to value, resolved by precedence
pub type MergedVariables = BTreeMap<String, String>;

/// Merge the three variable tiers, lowest precedence first
///
/// Defaults < user-state fields < extra variables. A higher tier replaces a
/// same-named value outright.
pub fn merge_variables(
    entry: &TemplateEntry,
    state: &UserState,
    extra_vars: Option<&BTreeMap<String, String>>,
) -> MergedVariables {
    let mut merged = entry.defaults.clone();
    merged.extend(state.variables().into_iter().map(|(k, v)| (k.to_string(), v)));
    if let Some(extra) = extra_vars {
        merged.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    debug!(count = merged.len(), "merge_variables: merged");
    merged
}

/// Replace every `{name}` with its value; unknown names become ""
pub fn interpolate(template: &str, vars: &MergedVariables) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match vars.get(name) {
                Some(value) => value.clone(),
                None => {
                    debug!(%name, "interpolate: missing placeholder, substituting empty string");
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Build the final prompt for the generation service
pub fn synthesize(
    entry: &TemplateEntry,
    state: &UserState,
    last_feedback: Option<&str>,
    extra_vars: Option<&BTreeMap<String, String>>,
) -> String {
    debug!(has_feedback = last_feedback.is_some(), "synthesize: called");
    let merged = merge_variables(entry, state, extra_vars);
    let mut prompt = interpolate(&entry.template, &merged);

    if let Some(feedback) = last_feedback.filter(|f| !f.is_empty()) {
        prompt.push_str(&format!(" Adjust according to feedback: {}.", feedback));
    }
    if !state.sound_preference.is_empty() {
        prompt.push_str(&format!(" Preferred instruments: {}.", state.sound_preference));
    }

    prompt
}
