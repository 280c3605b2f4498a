//! Session runtime executor

use super::traits::EventChannel;
use super::{SessionHandle, SessionInput, SessionSnapshot, SessionUpdate};

use crate::state_machine::{
    dispatch_inbound, transition, Effect, Event, RequestId, SessionContext, SessionState,
    TransitionError,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

const UPDATE_BUFFER: usize = 128;

/// Drives one session over any event channel
pub struct SessionRuntime<C>
where
    C: EventChannel + 'static,
{
    context: SessionContext,
    state: SessionState,
    channel: Arc<C>,
    input_rx: mpsc::Receiver<SessionInput>,
    /// Weak so the loop ends once every handle and channel reader is gone
    input_tx: mpsc::WeakSender<SessionInput>,
    updates_tx: broadcast::Sender<SessionUpdate>,
    /// `None` disables reply timers
    reply_timeout: Option<Duration>,
    /// Token to cancel the running reply timer
    timer_cancel_token: Option<CancellationToken>,
}

impl<C> SessionRuntime<C>
where
    C: EventChannel + 'static,
{
    /// Build a runtime and the handle that feeds it
    ///
    /// `input_tx` must be the sender paired with `input_rx`; clones of it may
    /// already have been given to a channel's delivery loop.
    pub fn new(
        context: SessionContext,
        channel: C,
        input_rx: mpsc::Receiver<SessionInput>,
        input_tx: mpsc::Sender<SessionInput>,
        reply_timeout: Option<Duration>,
    ) -> (Self, SessionHandle) {
        let (updates_tx, _) = broadcast::channel(UPDATE_BUFFER);
        let runtime = Self {
            context,
            state: SessionState::new(),
            channel: Arc::new(channel),
            input_rx,
            input_tx: input_tx.downgrade(),
            updates_tx: updates_tx.clone(),
            reply_timeout,
            timer_cancel_token: None,
        };
        (runtime, SessionHandle::new(input_tx, updates_tx))
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            reply_timeout_secs = self.reply_timeout.map(|d| d.as_secs()),
            "Starting session runtime"
        );

        // Observers subscribed before the loop starts see the landing screen
        self.publish_snapshot();

        // Process inputs in a loop - no recursion
        while let Some(input) = self.input_rx.recv().await {
            if let Err(e) = self.process_input(input).await {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    phase = self.state.protocol.name(),
                    error = %e,
                    "Input rejected"
                );
                let _ = self.updates_tx.send(SessionUpdate::Rejected {
                    reason: e.to_string(),
                });
            }
        }

        self.cancel_reply_timer();
        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    async fn process_input(&mut self, input: SessionInput) -> Result<(), TransitionError> {
        // Effects may generate follow-up events (a failed send becomes an error)
        let mut inputs_to_process = VecDeque::from([input]);

        while let Some(current) = inputs_to_process.pop_front() {
            // Pure state transition
            let result = match current {
                SessionInput::Action(event) => {
                    tracing::debug!(event = event.name(), "Handling action");
                    transition(&self.state, event)?
                }
                SessionInput::Inbound(named) => {
                    tracing::debug!(event = %named.event, "Handling inbound event");
                    dispatch_inbound(&self.state, named)?
                }
            };

            let old_phase = self.state.protocol.name();
            self.state = result.new_state;
            if old_phase != self.state.protocol.name() {
                tracing::info!(
                    session_id = %self.context.session_id,
                    from = old_phase,
                    to = self.state.protocol.name(),
                    turns = self.state.history.turns().len(),
                    answered = self.state.qa.answered().count(),
                    "Phase change"
                );
            }

            for effect in result.effects {
                if let Some(generated) = self.execute_effect(effect).await {
                    inputs_to_process.push_back(SessionInput::Action(generated));
                }
            }
        }

        Ok(())
    }

    /// Execute an effect and optionally return a generated event
    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::Send(event) => match self.channel.send(&event).await {
                Ok(()) => {
                    tracing::info!(
                        session_id = %self.context.session_id,
                        event = event.name(),
                        "Sent event to interviewer service"
                    );
                    None
                }
                Err(e) => {
                    tracing::error!(
                        session_id = %self.context.session_id,
                        event = event.name(),
                        error = %e,
                        "Failed to send event"
                    );
                    Some(Event::ServiceError {
                        message: format!("failed to send {}: {e}", event.name()),
                    })
                }
            },

            Effect::ArmReplyTimer { request_id } => {
                self.arm_reply_timer(request_id);
                None
            }

            Effect::CancelReplyTimer => {
                self.cancel_reply_timer();
                None
            }

            Effect::Notify => {
                self.publish_snapshot();
                None
            }

            Effect::RecordFailure { reason } => {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    reason = %reason,
                    "Interviewer exchange failed"
                );
                None
            }
        }
    }

    fn arm_reply_timer(&mut self, request_id: RequestId) {
        self.cancel_reply_timer();
        let Some(timeout) = self.reply_timeout else {
            return;
        };

        let cancel_token = CancellationToken::new();
        self.timer_cancel_token = Some(cancel_token.clone());
        let input_tx = self.input_tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;

                () = cancel_token.cancelled() => {}

                () = tokio::time::sleep(timeout) => {
                    tracing::debug!(%request_id, "Reply timer fired");
                    if let Some(tx) = input_tx.upgrade() {
                        let _ = tx
                            .send(SessionInput::Action(Event::ReplyTimeout { request_id }))
                            .await;
                    }
                }
            }
        });
    }

    fn cancel_reply_timer(&mut self) {
        if let Some(token) = self.timer_cancel_token.take() {
            token.cancel();
        }
    }

    fn publish_snapshot(&self) {
        let snapshot = SessionSnapshot::capture(&self.context, &self.state);
        // No subscribers is fine
        let _ = self
            .updates_tx
            .send(SessionUpdate::Snapshot(Arc::new(snapshot)));
    }
}
