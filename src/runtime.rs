//! Runtime for executing interview sessions
//!
//! One runtime task owns one `SessionState`. User actions, inbound channel
//! events and timer expiries all queue up on a single input channel and are
//! processed one at a time to completion.

mod executor;
pub mod traits;


pub use executor::SessionRuntime;
pub use traits::*;

use crate::channel::NamedEvent;
use crate::session::{
    InterviewType, JobBackground, QaPair, SessionView, Summary, Turn,
};
use crate::state_machine::{Event, SessionContext, SessionState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::BroadcastStream;
use uuid::Uuid;

/// Anything the runtime loop reacts to
#[derive(Debug, Clone)]
pub enum SessionInput {
    /// A user action or an internally generated event
    Action(Event),
    /// A raw named event delivered by the channel
    Inbound(NamedEvent),
}

/// Read-only projection of the session for renderers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub view: SessionView,
    pub phase: &'static str,
    pub interview_type: Option<InterviewType>,
    pub job_background: Option<JobBackground>,
    pub history: Vec<Turn>,
    pub questions_and_answers: Vec<QaPair>,
    pub summary: Option<Summary>,
    pub pending_response: bool,
}

impl SessionSnapshot {
    pub fn capture(context: &SessionContext, state: &SessionState) -> Self {
        Self {
            session_id: context.session_id,
            created_at: context.created_at,
            view: state.view(),
            phase: state.protocol.name(),
            interview_type: state.interview_type,
            job_background: state.job_background.clone(),
            history: state.history.snapshot(),
            questions_and_answers: state.qa.snapshot(),
            summary: state.summary.clone(),
            pending_response: state.pending_response,
        }
    }
}

/// Notifications sent to observers
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    /// State changed
    Snapshot(Arc<SessionSnapshot>),
    /// An input was refused; state is unchanged
    Rejected { reason: String },
}

#[derive(Debug, Error)]
#[error("Session runtime has stopped")]
pub struct RuntimeClosed;

/// Cloneable front door to a running session
#[derive(Clone)]
pub struct SessionHandle {
    input_tx: mpsc::Sender<SessionInput>,
    updates_tx: broadcast::Sender<SessionUpdate>,
}

impl SessionHandle {
    pub(crate) fn new(
        input_tx: mpsc::Sender<SessionInput>,
        updates_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        Self {
            input_tx,
            updates_tx,
        }
    }

    async fn act(&self, event: Event) -> Result<(), RuntimeClosed> {
        self.input_tx
            .send(SessionInput::Action(event))
            .await
            .map_err(|_| RuntimeClosed)
    }

    pub async fn choose_interview_type(
        &self,
        interview_type: InterviewType,
    ) -> Result<(), RuntimeClosed> {
        self.act(Event::ChooseInterviewType { interview_type }).await
    }

    pub async fn return_to_landing(&self) -> Result<(), RuntimeClosed> {
        self.act(Event::ReturnToLanding).await
    }

    pub async fn start_session(
        &self,
        interview_type: InterviewType,
        job_background: JobBackground,
    ) -> Result<(), RuntimeClosed> {
        self.act(Event::StartSession {
            interview_type,
            job_background,
        })
        .await
    }

    pub async fn submit_user_message(&self, text: impl Into<String>) -> Result<(), RuntimeClosed> {
        self.act(Event::SubmitUserMessage { text: text.into() }).await
    }

    pub async fn end_session(&self) -> Result<(), RuntimeClosed> {
        self.act(Event::EndSession).await
    }

    pub async fn restart(&self) -> Result<(), RuntimeClosed> {
        self.act(Event::Restart).await
    }

    /// Hand an inbound named event to the session, as a channel would
    #[cfg(test)]
    pub async fn deliver(&self, inbound: NamedEvent) -> Result<(), RuntimeClosed> {
        self.input_tx
            .send(SessionInput::Inbound(inbound))
            .await
            .map_err(|_| RuntimeClosed)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.updates_tx.subscribe()
    }

    /// Update stream for renderers; lagged updates are skipped
    pub fn updates(&self) -> BroadcastStream<SessionUpdate> {
        BroadcastStream::new(self.subscribe())
    }
}
