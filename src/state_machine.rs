//! Session protocol state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod dispatch;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use dispatch::{dispatch_inbound, inbound_event_names};
pub use effect::Effect;
pub use event::Event;
pub use state::{RequestId, SessionContext, SessionState};
pub use transition::{transition, TransitionError};
