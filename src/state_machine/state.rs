//! Session state types

use crate::session::{
    ConversationHistory, InterviewType, JobBackground, QaSequence, SessionView, Summary, ViewState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Protocol State
// ============================================================================

/// Identifies one outstanding request so a late timer can tell it is stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// What the interviewer is expected to send next while awaiting a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReply {
    /// Opening message after `start_interview`
    Greeting,
    /// Reply to a candidate answer
    Reply,
}

/// Where the exchange with the interviewer service stands
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolState {
    /// No interview running; landing or intake screens
    #[default]
    Idle,

    /// A request is in flight and the interviewer has not answered yet
    AwaitingReply {
        /// Newest request; the reply timer is armed for it
        request_id: RequestId,
        pending: PendingReply,
        /// Replies still owed, one per request sent since the last composing phase
        replies_due: u32,
    },

    /// Interviewer has spoken; candidate may type
    Composing,

    /// `end_interview` sent, waiting for the summary
    Ending {
        request_id: RequestId,
        /// Replies to earlier messages that may still arrive before the summary
        replies_due: u32,
    },

    /// Summary received
    Ended,
}

impl ProtocolState {
    /// Short phase name for logs and snapshots
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingReply {
                pending: PendingReply::Greeting,
                ..
            } => "starting",
            Self::AwaitingReply { .. } => "awaiting_reply",
            Self::Composing => "composing",
            Self::Ending { .. } => "ending",
            Self::Ended => "ended",
        }
    }

    /// A request is outstanding
    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::AwaitingReply { .. } | Self::Ending { .. })
    }

    pub fn outstanding_request(&self) -> Option<RequestId> {
        match self {
            Self::AwaitingReply { request_id, .. } | Self::Ending { request_id, .. } => {
                Some(*request_id)
            }
            _ => None,
        }
    }

    pub fn replies_due(&self) -> u32 {
        match self {
            Self::AwaitingReply { replies_due, .. } | Self::Ending { replies_due, .. } => *replies_due,
            _ => 0,
        }
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Everything one interview session owns
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub protocol: ProtocolState,
    pub view: ViewState,
    pub interview_type: Option<InterviewType>,
    pub job_background: Option<JobBackground>,
    pub history: ConversationHistory,
    pub qa: QaSequence,
    pub summary: Option<Summary>,
    /// "Interviewer is typing" indicator
    pub pending_response: bool,
    /// Monotonic across restarts so old timers never match new requests
    next_request: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> SessionView {
        self.view.current()
    }

    pub(crate) fn allocate_request(&mut self) -> RequestId {
        let id = RequestId(self.next_request);
        self.next_request += 1;
        id
    }

    /// Discard all per-interview data, keeping the request counter
    pub(crate) fn clear_session_data(&mut self) {
        self.interview_type = None;
        self.job_background = None;
        self.history.reset();
        self.qa.reset();
        self.summary = None;
        self.pending_response = false;
    }
}

/// Identity of one session runtime (immutable)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
