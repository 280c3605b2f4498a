//! Named-event wire format
//!
//! Every message is one JSON object `{"event": <name>, "data": <payload>}`
//! on its own line.

use crate::session::{InterviewType, JobBackground, QaPair, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named event with an untyped payload, as it arrives off the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEvent {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl NamedEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }
}

/// Events the coordinator sends to the interviewer service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum OutboundEvent {
    StartInterview {
        #[serde(rename = "type")]
        interview_type: InterviewType,
        #[serde(rename = "jobBackground")]
        job_background: JobBackground,
    },
    UserMessage {
        conversation_history: Vec<Turn>,
        job_background: JobBackground,
        interview_type: InterviewType,
    },
    EndInterview {
        conversation_history: Vec<Turn>,
        job_background: JobBackground,
        interview_type: InterviewType,
        questions_and_answers: Vec<QaPair>,
    },
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartInterview { .. } => "start_interview",
            Self::UserMessage { .. } => "user_message",
            Self::EndInterview { .. } => "end_interview",
        }
    }
}

/// Payload of `interviewer_message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewerMessagePayload {
    pub message: String,
}

/// Payload of `error`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
}

/// Encode an outbound event as one newline-terminated line
pub fn encode_line(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    let mut line = serde_json::to_string(event)?;
    line.push('\n');
    Ok(line)
}

/// Decode one inbound line
pub fn decode_line(line: &str) -> Result<NamedEvent, serde_json::Error> {
    serde_json::from_str(line.trim())
}
