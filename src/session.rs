//! Session data model
//!
//! Conversation history, Q&A pairing and the visible-view tracker. All of it
//! is owned by the protocol state machine; nothing here knows about events.

mod history;
mod pairing;
mod types;
mod view;

pub use history::ConversationHistory;
pub use pairing::QaSequence;
pub use types::{Comparison, InterviewType, JobBackground, QaPair, Role, Summary, Turn};
pub use view::{SessionView, ViewState};
