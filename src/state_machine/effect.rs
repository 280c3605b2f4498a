//! Effects produced by state transitions

use super::state::RequestId;
use crate::channel::OutboundEvent;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fire-and-forget send to the interviewer service
    Send(OutboundEvent),

    /// Start the reply timer for the outstanding request
    ArmReplyTimer { request_id: RequestId },

    /// No request is outstanding any more
    CancelReplyTimer,

    /// Publish a fresh snapshot to observers
    Notify,

    /// Log why an exchange failed; the conversation only shows a generic notice
    RecordFailure { reason: String },
}

impl Effect {
    pub fn record_failure(reason: impl Into<String>) -> Self {
        Effect::RecordFailure {
            reason: reason.into(),
        }
    }
}
