//! Events that can occur in a session

use super::state::RequestId;
use crate::session::{InterviewType, JobBackground, Summary};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // User events
    ChooseInterviewType {
        interview_type: InterviewType,
    },
    ReturnToLanding,
    StartSession {
        interview_type: InterviewType,
        job_background: JobBackground,
    },
    SubmitUserMessage {
        text: String,
    },
    EndSession,
    Restart,

    // Interviewer service events
    InterviewerMessage {
        message: String,
    },
    InterviewSummary {
        summary: Summary,
    },
    /// Remote failure, or a local send failure standing in for one
    ServiceError {
        message: String,
    },

    // Runtime events
    ReplyTimeout {
        request_id: RequestId,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChooseInterviewType { .. } => "choose_interview_type",
            Self::ReturnToLanding => "return_to_landing",
            Self::StartSession { .. } => "start_session",
            Self::SubmitUserMessage { .. } => "submit_user_message",
            Self::EndSession => "end_session",
            Self::Restart => "restart",
            Self::InterviewerMessage { .. } => "interviewer_message",
            Self::InterviewSummary { .. } => "interview_summary",
            Self::ServiceError { .. } => "error",
            Self::ReplyTimeout { .. } => "reply_timeout",
        }
    }
}
