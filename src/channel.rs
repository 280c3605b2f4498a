//! Event channel to the interviewer service
//!
//! The coordinator only needs ordered, named events with JSON payloads. The
//! TCP adapter carries them as newline-delimited JSON.

mod tcp;
mod wire;

pub use tcp::TcpEventChannel;
pub use wire::{ErrorPayload, InterviewerMessagePayload, NamedEvent, OutboundEvent};

use thiserror::Error;

/// Failures of the transport underneath the session
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Channel I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode {event}: {source}")]
    Encode {
        event: &'static str,
        source: serde_json::Error,
    },
    #[error("Channel is closed")]
    Closed,
}
