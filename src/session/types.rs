//! Session data model types
//!
//! Field names follow the interviewer service's wire contract, which mixes
//! camelCase (job background) and `snake_case` (everything else).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Interview Setup
// ============================================================================

/// Kind of interview the candidate selected on the landing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    General,
}

impl InterviewType {
    /// Every interview type, in landing-screen order
    pub const ALL: [InterviewType; 3] = [Self::Technical, Self::Behavioral, Self::General];

    /// Wire name (`technical`, `behavioral`, `general`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Behavioral => "behavioral",
            Self::General => "general",
        }
    }

    /// Human-readable label for menus
    pub fn label(self) -> &'static str {
        match self {
            Self::Technical => "Technical Interview",
            Self::Behavioral => "Behavioral Interview",
            Self::General => "General Interview",
        }
    }

    /// Look up a type by its 1-based landing menu position
    pub fn from_menu_choice(choice: &str) -> Option<Self> {
        let index: usize = choice.trim().parse().ok()?;
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job the candidate is interviewing for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobBackground {
    #[serde(rename = "jobTitle", alias = "title", default)]
    pub title: String,
    #[serde(rename = "jobDesc", alias = "description", default)]
    pub description: String,
}

impl JobBackground {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into().trim().to_string(),
            description: description.into().trim().to_string(),
        }
    }
}

// ============================================================================
// Conversation
// ============================================================================

/// Who produced a turn
///
/// The interviewer side travels as `assistant` because the service hands the
/// history straight to a chat-completion model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    #[serde(rename = "assistant", alias = "interviewer")]
    Interviewer,
}

/// One message in the conversation, in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Interviewer,
            content: content.into(),
        }
    }
}

/// A reconstructed question/answer association; either side may be empty
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    /// A pair is closed once both sides are populated
    pub fn is_closed(&self) -> bool {
        !self.question.is_empty() && !self.answer.is_empty()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Candidate answer set against a model answer for the same question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub question: String,
    pub user_answer: String,
    pub sample_answer: String,
}

/// Final interview feedback produced by the interviewer service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub transcript: Vec<Turn>,
    #[serde(default)]
    pub suggestions: String,
    #[serde(default)]
    pub comparisons: Vec<Comparison>,
}
