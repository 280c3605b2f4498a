//! Append-only conversation log

use super::types::Turn;
use serde::{Deserialize, Serialize};

/// Ordered turns for one session. Only grows between resets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<Turn>,
}

impl ConversationHistory {
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Start a fresh log for a new session
    pub fn reset(&mut self) {
        self.turns = Vec::new();
    }

    /// Full ordered sequence, for transmission
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    #[cfg(test)]
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
