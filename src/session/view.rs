//! Which screen is visible

use super::types::InterviewType;
use serde::{Deserialize, Serialize};

/// The single visible screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionView {
    #[default]
    Landing,
    TechnicalIntake,
    BehavioralIntake,
    GeneralIntake,
    Chat,
    Processing,
    Summary,
}

impl SessionView {
    /// Intake form shown after picking an interview type
    pub fn intake_for(interview_type: InterviewType) -> Self {
        match interview_type {
            InterviewType::Technical => Self::TechnicalIntake,
            InterviewType::Behavioral => Self::BehavioralIntake,
            InterviewType::General => Self::GeneralIntake,
        }
    }

    /// Interview type an intake view belongs to
    pub fn intake_type(self) -> Option<InterviewType> {
        match self {
            Self::TechnicalIntake => Some(InterviewType::Technical),
            Self::BehavioralIntake => Some(InterviewType::Behavioral),
            Self::GeneralIntake => Some(InterviewType::General),
            _ => None,
        }
    }
}

/// Holds exactly one visible view; `show` replaces it outright.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    current: SessionView,
}

impl ViewState {
    pub fn show(&mut self, view: SessionView) {
        if self.current != view {
            tracing::debug!(from = ?self.current, to = ?view, "View change");
        }
        self.current = view;
    }

    pub fn current(&self) -> SessionView {
        self.current
    }
}
