//! Inbound event dispatch table
//!
//! Maps each inbound event name to a pure handler that decodes the payload
//! and applies the transition. Replaying a recorded list of named events
//! through `dispatch_inbound` reproduces a session without a live channel.

use super::state::SessionState;
use super::transition::{transition, TransitionError, TransitionResult};
use super::Event;
use crate::channel::{ErrorPayload, InterviewerMessagePayload, NamedEvent};
use crate::session::Summary;
use serde::de::DeserializeOwned;
use serde_json::Value;

type InboundHandler = fn(&SessionState, Value) -> Result<TransitionResult, TransitionError>;

const INBOUND_HANDLERS: &[(&str, InboundHandler)] = &[
    ("interviewer_message", on_interviewer_message),
    ("interview_summary", on_interview_summary),
    ("error", on_error),
];

/// Names the coordinator accepts from the interviewer service
pub fn inbound_event_names() -> impl Iterator<Item = &'static str> {
    INBOUND_HANDLERS.iter().map(|(name, _)| *name)
}

/// Apply one inbound named event to the session
pub fn dispatch_inbound(
    state: &SessionState,
    inbound: NamedEvent,
) -> Result<TransitionResult, TransitionError> {
    let handler = INBOUND_HANDLERS
        .iter()
        .find(|(name, _)| *name == inbound.event)
        .map(|(_, handler)| *handler)
        .ok_or(TransitionError::UnknownEvent(inbound.event))?;
    handler(state, inbound.data)
}

fn decode<T: DeserializeOwned>(event: &str, data: Value) -> Result<T, TransitionError> {
    serde_json::from_value(data).map_err(|e| TransitionError::MalformedPayload {
        event: event.to_string(),
        message: e.to_string(),
    })
}

fn on_interviewer_message(
    state: &SessionState,
    data: Value,
) -> Result<TransitionResult, TransitionError> {
    let payload: InterviewerMessagePayload = decode("interviewer_message", data)?;
    transition(
        state,
        Event::InterviewerMessage {
            message: payload.message,
        },
    )
}

fn on_interview_summary(
    state: &SessionState,
    data: Value,
) -> Result<TransitionResult, TransitionError> {
    let summary: Summary = decode("interview_summary", data)?;
    transition(state, Event::InterviewSummary { summary })
}

fn on_error(state: &SessionState, data: Value) -> Result<TransitionResult, TransitionError> {
    // A bare `error` with no usable payload still counts as a failure
    let payload: ErrorPayload = decode("error", data).unwrap_or(ErrorPayload {
        message: "unspecified interviewer service error".to_string(),
    });
    transition(
        state,
        Event::ServiceError {
            message: payload.message,
        },
    )
}
