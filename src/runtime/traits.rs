//! Trait abstractions for runtime I/O
//!
//! The executor only talks to the interviewer service through `EventChannel`,
//! so tests can swap in a recording implementation.

use crate::channel::{ChannelError, OutboundEvent};
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound half of the event channel
///
/// Inbound events are pushed into the runtime's input queue by the channel's
/// own delivery loop, so only sending is part of the trait.
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// Deliver one named event; returns once it is handed to the transport
    async fn send(&self, event: &OutboundEvent) -> Result<(), ChannelError>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: EventChannel + ?Sized> EventChannel for Arc<T> {
    async fn send(&self, event: &OutboundEvent) -> Result<(), ChannelError> {
        (**self).send(event).await
    }
}
