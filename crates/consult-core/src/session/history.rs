//! The transcript sent to the completion gateway.

use super::message::{Role, Turn};
use serde::{Deserialize, Serialize};

/// Ordered, append-only list of turns whose first entry is the system turn.
///
/// Only the system turn may be rewritten in place, and only the trailing
/// user turn may be removed. There is no length cap; the gateway is stateless
/// so the whole transcript goes out on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    turns: Vec<Turn>,
}

impl History {
    /// Creates a transcript seeded with a single system turn.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(system_prompt)],
        }
    }

    pub fn append_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::user(text));
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn::assistant(text));
    }

    /// Overwrites the content of Turn[0]. No-op if Turn[0] is not a system turn.
    pub fn replace_system_prompt(&mut self, text: impl Into<String>) {
        match self.turns.first_mut() {
            Some(turn) if turn.role == Role::System => turn.content = text.into(),
            _ => tracing::warn!("transcript has no leading system turn; prompt not replaced"),
        }
    }

    /// Removes the trailing turn if it is a user turn and returns it.
    ///
    /// Callers invoke this only right after the gateway call that followed
    /// `append_user` failed.
    pub fn rollback_last_user(&mut self) -> Option<Turn> {
        if self.turns.last().is_some_and(|t| t.role == Role::User) {
            self.turns.pop()
        } else {
            tracing::warn!("rollback requested but last turn is not a user turn");
            None
        }
    }

    /// The full transcript, in append order.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.turns
            .first()
            .filter(|t| t.role == Role::System)
            .map(|t| t.content.as_str())
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
