//! The accumulating patient record built during guided intake.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One raw patient reply with the moment it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedResponse {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// Structured facts gathered from free-text patient replies.
///
/// Category lists are not mutually exclusive: one reply may appear in
/// several of them. `main_complaint` is always the first reply verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub main_complaint: Option<String>,
    pub symptoms: Vec<String>,
    pub chronic_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub responses: Vec<RecordedResponse>,
    pub final_recommendations: Option<String>,
}

impl PatientRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` until the first reply is recorded.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty() && self.main_complaint.is_none()
    }

    /// Drops the most recent entry of `responses` only.
    ///
    /// Category lists and `main_complaint` keep whatever that reply
    /// contributed; this undoes the response log, not the extraction.
    pub fn remove_last_response(&mut self) -> Option<RecordedResponse> {
        self.responses.pop()
    }

    /// Multi-line textual rendering used by the `summary` command.
    pub fn render_summary(&self) -> String {
        self.to_string()
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, title: &str, items: &[String]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    if items.is_empty() {
        return writeln!(f, "  none recorded");
    }
    for (i, item) in items.iter().enumerate() {
        writeln!(f, "  {}. {}", i + 1, item)?;
    }
    Ok(())
}

impl fmt::Display for PatientRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Patient record ===")?;
        writeln!(
            f,
            "Main complaint: {}",
            self.main_complaint.as_deref().unwrap_or("not recorded")
        )?;
        write_list(f, "Symptoms", &self.symptoms)?;
        write_list(f, "Chronic conditions", &self.chronic_conditions)?;
        write_list(f, "Allergies", &self.allergies)?;
        write_list(f, "Medications", &self.medications)?;
        writeln!(f, "Responses recorded: {}", self.responses.len())?;
        if let Some(recommendations) = &self.final_recommendations {
            writeln!(f, "Final recommendations:")?;
            for line in recommendations.lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
