//! Question/answer reconstruction from the turn stream
//!
//! Turns from both sides arrive on independent event streams, so either side
//! may speak first. Each turn fills the empty side of the tail pair when it
//! can and otherwise opens a new pair. A filled side is never overwritten.

use super::types::{QaPair, Role, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QaSequence {
    pairs: Vec<QaPair>,
}

impl QaSequence {
    /// Feed one turn, in arrival order
    pub fn record(&mut self, turn: &Turn) {
        let content = turn.content.clone();
        match turn.role {
            Role::User => match self.pairs.last_mut() {
                Some(tail) if tail.answer.is_empty() => tail.answer = content,
                _ => self.pairs.push(QaPair {
                    question: String::new(),
                    answer: content,
                }),
            },
            Role::Interviewer => match self.pairs.last_mut() {
                Some(tail) if tail.question.is_empty() => tail.question = content,
                _ => self.pairs.push(QaPair {
                    question: content,
                    answer: String::new(),
                }),
            },
        }
    }

    /// Must accompany every `ConversationHistory::reset`
    pub fn reset(&mut self) {
        self.pairs = Vec::new();
    }

    #[cfg(test)]
    pub fn pairs(&self) -> &[QaPair] {
        &self.pairs
    }

    pub fn snapshot(&self) -> Vec<QaPair> {
        self.pairs.clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pairs with both a question and an answer; only these get sample answers
    pub fn answered(&self) -> impl Iterator<Item = &QaPair> {
        self.pairs.iter().filter(|p| p.is_closed())
    }
}
