//! Pure state transition function
//!
//! Given the same state and event this always produces the same new state and
//! effects. All I/O happens in the runtime when it executes the effects.

use super::state::{PendingReply, ProtocolState, SessionState};
use super::{Effect, Event};
use crate::channel::OutboundEvent;
use crate::session::{InterviewType, JobBackground, SessionView, Summary, Turn};
use thiserror::Error;

/// Shown in the conversation when the interviewer service reports a failure
pub const FAILURE_NOTICE: &str =
    "Sorry, something went wrong on the interviewer's side. Please try again.";

/// Shown in the conversation when a reply never arrives
pub const TIMEOUT_NOTICE: &str =
    "The interviewer is taking too long to respond. Please try again.";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{event} is not allowed while the session is {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
    #[error("Unknown inbound event: {0}")]
    UnknownEvent(String),
    #[error("Malformed {event} payload: {message}")]
    MalformedPayload { event: String, message: String },
}

/// Pure transition function
pub fn transition(state: &SessionState, event: Event) -> Result<TransitionResult, TransitionError> {
    match (&state.protocol, event) {
        // ============================================================
        // Input hygiene
        // ============================================================

        // Blank submissions are dropped before any state check
        (_, Event::SubmitUserMessage { text }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        // ============================================================
        // Landing and intake screens
        // ============================================================
        (ProtocolState::Idle, Event::ChooseInterviewType { interview_type }) => {
            let mut next = state.clone();
            next.view.show(SessionView::intake_for(interview_type));
            Ok(TransitionResult::new(next).with_effect(Effect::Notify))
        }

        (ProtocolState::Idle, Event::ReturnToLanding) => {
            let mut next = state.clone();
            next.view.show(SessionView::Landing);
            Ok(TransitionResult::new(next).with_effect(Effect::Notify))
        }

        // ============================================================
        // Start
        // ============================================================
        (
            ProtocolState::Idle | ProtocolState::Ended,
            Event::StartSession {
                interview_type,
                job_background,
            },
        ) => Ok(start_session(state, interview_type, job_background)),

        // ============================================================
        // Conversation
        // ============================================================
        (
            ProtocolState::Composing | ProtocolState::AwaitingReply { .. },
            Event::SubmitUserMessage { text },
        ) => Ok(submit_user_message(state, text.trim())),

        (ProtocolState::AwaitingReply { .. }, Event::InterviewerMessage { message }) => {
            Ok(receive_reply(state, message))
        }

        // Replies to messages sent before ending still belong in the transcript
        (ProtocolState::Ending { replies_due, .. }, Event::InterviewerMessage { message })
            if *replies_due > 0 =>
        {
            Ok(receive_reply(state, message))
        }

        // ============================================================
        // End and summary
        // ============================================================
        (ProtocolState::Composing | ProtocolState::AwaitingReply { .. }, Event::EndSession) => {
            Ok(end_session(state))
        }

        (ProtocolState::Ending { .. }, Event::InterviewSummary { summary }) => {
            Ok(receive_summary(state, summary))
        }

        (ProtocolState::Ended, Event::Restart) => {
            let mut next = state.clone();
            next.clear_session_data();
            next.protocol = ProtocolState::Idle;
            next.view.show(SessionView::Landing);
            Ok(TransitionResult::new(next).with_effect(Effect::Notify))
        }

        // ============================================================
        // Failures
        // ============================================================
        (protocol, Event::ServiceError { message }) if protocol.is_waiting() => {
            Ok(recover(state, FAILURE_NOTICE, message))
        }

        (protocol, Event::ReplyTimeout { request_id: fired })
            if protocol.outstanding_request() == Some(fired) =>
        {
            Ok(recover(
                state,
                TIMEOUT_NOTICE,
                format!("no reply to {fired} before the timeout"),
            ))
        }

        // A newer request superseded the one this timer was armed for
        (_, Event::ReplyTimeout { .. }) => Ok(TransitionResult::new(state.clone())),

        // ============================================================
        // Invalid Transitions
        // ============================================================
        (protocol, event) => Err(TransitionError::InvalidTransition {
            state: protocol.name(),
            event: event.name(),
        }),
    }
}

// Helper functions

fn append_turn(state: &mut SessionState, turn: Turn) {
    state.qa.record(&turn);
    state.history.append(turn);
}

fn start_session(
    state: &SessionState,
    interview_type: InterviewType,
    job_background: JobBackground,
) -> TransitionResult {
    let mut next = state.clone();
    next.clear_session_data();
    next.interview_type = Some(interview_type);
    next.job_background = Some(job_background.clone());
    next.view.show(SessionView::Chat);
    next.pending_response = true;

    let request_id = next.allocate_request();
    next.protocol = ProtocolState::AwaitingReply {
        request_id,
        pending: PendingReply::Greeting,
        replies_due: 1,
    };

    TransitionResult::new(next)
        .with_effect(Effect::Send(OutboundEvent::StartInterview {
            interview_type,
            job_background,
        }))
        .with_effect(Effect::ArmReplyTimer { request_id })
        .with_effect(Effect::Notify)
}

fn submit_user_message(state: &SessionState, text: &str) -> TransitionResult {
    let mut next = state.clone();
    append_turn(&mut next, Turn::user(text));
    next.pending_response = true;

    // The timer follows the newest request; earlier replies are still counted
    let request_id = next.allocate_request();
    next.protocol = ProtocolState::AwaitingReply {
        request_id,
        pending: PendingReply::Reply,
        replies_due: state.protocol.replies_due() + 1,
    };

    let outbound = OutboundEvent::UserMessage {
        conversation_history: next.history.snapshot(),
        job_background: next.job_background.clone().unwrap_or_default(),
        interview_type: next.interview_type.unwrap_or(InterviewType::General),
    };

    TransitionResult::new(next)
        .with_effect(Effect::Send(outbound))
        .with_effect(Effect::ArmReplyTimer { request_id })
        .with_effect(Effect::Notify)
}

/// Record one interviewer reply; composing resumes once none are owed
fn receive_reply(state: &SessionState, message: String) -> TransitionResult {
    let mut next = state.clone();
    append_turn(&mut next, Turn::interviewer(message));

    match state.protocol {
        ProtocolState::AwaitingReply {
            request_id,
            pending,
            replies_due,
        } if replies_due > 1 => {
            next.protocol = ProtocolState::AwaitingReply {
                request_id,
                pending,
                replies_due: replies_due - 1,
            };
            TransitionResult::new(next).with_effect(Effect::Notify)
        }
        ProtocolState::Ending {
            request_id,
            replies_due,
        } => {
            // The summary request keeps its timer
            next.protocol = ProtocolState::Ending {
                request_id,
                replies_due: replies_due.saturating_sub(1),
            };
            TransitionResult::new(next).with_effect(Effect::Notify)
        }
        _ => {
            next.pending_response = false;
            next.protocol = ProtocolState::Composing;
            TransitionResult::new(next)
                .with_effect(Effect::CancelReplyTimer)
                .with_effect(Effect::Notify)
        }
    }
}

fn end_session(state: &SessionState) -> TransitionResult {
    let mut next = state.clone();
    next.view.show(SessionView::Processing);

    let request_id = next.allocate_request();
    next.protocol = ProtocolState::Ending {
        request_id,
        replies_due: state.protocol.replies_due(),
    };

    let outbound = OutboundEvent::EndInterview {
        conversation_history: next.history.snapshot(),
        job_background: next.job_background.clone().unwrap_or_default(),
        interview_type: next.interview_type.unwrap_or(InterviewType::General),
        questions_and_answers: next.qa.snapshot(),
    };

    TransitionResult::new(next)
        .with_effect(Effect::Send(outbound))
        .with_effect(Effect::ArmReplyTimer { request_id })
        .with_effect(Effect::Notify)
}

fn receive_summary(state: &SessionState, summary: Summary) -> TransitionResult {
    let mut next = state.clone();
    next.pending_response = false;
    next.summary = Some(summary);
    next.view.show(SessionView::Summary);
    next.protocol = ProtocolState::Ended;

    TransitionResult::new(next)
        .with_effect(Effect::CancelReplyTimer)
        .with_effect(Effect::Notify)
}

/// Back to composing with a notice in the conversation; history is kept
fn recover(state: &SessionState, notice: &str, reason: String) -> TransitionResult {
    let mut next = state.clone();
    next.pending_response = false;
    append_turn(&mut next, Turn::interviewer(notice));
    next.protocol = ProtocolState::Composing;
    if next.view() == SessionView::Processing {
        next.view.show(SessionView::Chat);
    }

    TransitionResult::new(next).with_effects([
        Effect::record_failure(reason),
        Effect::CancelReplyTimer,
        Effect::Notify,
    ])
}
