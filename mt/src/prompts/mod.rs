//! Prompt Template System
//!
//! Turns a user state and the last feedback into the text prompt sent to the
//! music generation service.
//!
//! Template loading chain:
//! 1. `{prompts-dir}/{scenario}.pmt` (operator override, optional)
//! 2. Embedded fallback compiled from `prompts/*.pmt`
//!
//! Templates use single-brace `{name}` placeholders; names that resolve to
//! nothing are replaced with the empty string.

pub mod embedded;
mod library;
mod selector;
mod synth;

pub use library::{ScenarioKey, TemplateEntry, TemplateLibrary};
pub use selector::{ANXIETY_SCENARIO_LEVEL, select};
pub use synth::{MergedVariables, interpolate, merge_variables, synthesize};
