//! Session domain model.

use super::app_mode::{Mode, ModeRegistry};
use super::history::History;
use crate::intake::PatientRecord;

/// The single live conversation: transcript, current mode and (for guided
/// intake) the patient record.
///
/// Replaced wholesale on `clear`; nothing is persisted across runs.
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    modes: ModeRegistry,
    history: History,
    record: PatientRecord,
}

impl Session {
    /// Creates a session whose transcript holds only the mode's system turn.
    pub fn new(mode: Mode) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            modes: ModeRegistry::new(mode),
            history: History::new(ModeRegistry::system_prompt_for(mode)),
            record: PatientRecord::new(),
        }
    }

    /// A fresh session in the same mode.
    pub fn cleared(&self) -> Self {
        Self::new(self.mode())
    }

    pub fn mode(&self) -> Mode {
        self.modes.current_mode()
    }

    pub fn temperature(&self) -> f64 {
        ModeRegistry::temperature_for(self.mode())
    }

    /// Switches mode and rewrites the system turn. Other turns are kept
    /// as they are. Returns `true` if the mode changed.
    pub fn switch_mode(&mut self, mode: Mode) -> bool {
        let changed = self.modes.set_mode(mode);
        if changed {
            self.history
                .replace_system_prompt(ModeRegistry::system_prompt_for(mode));
            tracing::info!(session_id = %self.id, mode = %mode, "mode switched");
        }
        changed
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut PatientRecord {
        &mut self.record
    }

    /// Replaces the record, e.g. with the result of `intake::extract`.
    pub fn set_record(&mut self, record: PatientRecord) {
        self.record = record;
    }
}
