//! Sink trait definition.

use async_trait::async_trait;
use chat_core::ChatError;

use crate::payload::LeadNotification;

/// A delivery channel for lead notifications.
///
/// Sinks are constructed only when their configuration is complete, so a
/// sink that exists is expected to try delivery. Failures come back as
/// [`ChatError::Notification`] and are the dispatcher's problem; sinks do
/// not retry.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver the payload to this channel.
    async fn deliver(&self, payload: &LeadNotification) -> Result<(), ChatError>;

    /// Name of this sink, for logging.
    fn name(&self) -> &str;
}
