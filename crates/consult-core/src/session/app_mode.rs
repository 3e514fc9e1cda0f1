//! Operating modes and their canonical prompts.
//!
//! Each mode selects exactly one system prompt and one generation
//! temperature. The registry only tracks which mode is current; applying a
//! switch to the transcript is the session's job.

use crate::error::ConsultError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PLAIN_PROMPT: &str = "You are a helpful assistant.";

const STRUCTURED_JSON_PROMPT: &str = "You are a helpful assistant. \
Always answer with a single valid JSON object and nothing else: no prose before or after it, \
no Markdown code fences. Use the shape \
{\"answer\": string, \"details\": [string], \"confidence\": \"low\" | \"medium\" | \"high\"}. \
If the request cannot be answered, set \"answer\" to an empty string and explain why in \"details\".";

const GUIDED_INTAKE_PROMPT: &str = "You are a virtual medical intake assistant. \
Your task is to understand the patient's situation before they see a doctor. \
Ask exactly one short question per message. \
First find out the main complaint, then its onset, character and intensity, \
then chronic conditions, allergies and medications the patient is taking. \
Do not diagnose while you are still collecting information. \
When you have enough information, reply with a final summary made of five numbered sections: \
1) Complaint summary, 2) Probable diagnosis, 3) Examination recommendations, \
4) What to do now, 5) When to see a doctor urgently. \
End the final summary with the sentence: \
\"This consultation does not replace an in-person medical exam.\"";

/// Represents the current operating mode of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Free-form assistant.
    #[default]
    Plain,
    /// Assistant constrained to a single JSON object per reply.
    StructuredJson,
    /// Question-by-question patient intake ending in a structured summary.
    GuidedIntake,
}

impl Mode {
    /// All known modes, in display order.
    pub const ALL: [Mode; 3] = [Mode::Plain, Mode::StructuredJson, Mode::GuidedIntake];

    /// Canonical name used in logs and on the console.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Plain => "plain",
            Mode::StructuredJson => "structured-json",
            Mode::GuidedIntake => "guided-intake",
        }
    }

    /// Target of the `json` toggle: structured-json goes back to plain,
    /// everything else goes to structured-json.
    pub fn json_toggled(&self) -> Mode {
        match self {
            Mode::StructuredJson => Mode::Plain,
            Mode::Plain | Mode::GuidedIntake => Mode::StructuredJson,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConsultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" => Ok(Mode::Plain),
            "json" | "structured-json" => Ok(Mode::StructuredJson),
            "intake" | "guided-intake" => Ok(Mode::GuidedIntake),
            other => Err(ConsultError::config(format!(
                "unknown mode '{other}' (expected plain, json or intake)"
            ))),
        }
    }
}

/// Holds the current mode and answers prompt/temperature lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeRegistry {
    current: Mode,
}

impl ModeRegistry {
    pub fn new(mode: Mode) -> Self {
        Self { current: mode }
    }

    pub fn current_mode(&self) -> Mode {
        self.current
    }

    /// Sets the current mode. Returns `true` if the mode actually changed.
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        let changed = self.current != mode;
        self.current = mode;
        changed
    }

    pub fn system_prompt_for(mode: Mode) -> &'static str {
        match mode {
            Mode::Plain => PLAIN_PROMPT,
            Mode::StructuredJson => STRUCTURED_JSON_PROMPT,
            Mode::GuidedIntake => GUIDED_INTAKE_PROMPT,
        }
    }

    pub fn temperature_for(mode: Mode) -> f64 {
        match mode {
            Mode::Plain => 0.7,
            Mode::StructuredJson | Mode::GuidedIntake => 0.3,
        }
    }
}
