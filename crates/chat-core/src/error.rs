//! Error taxonomy for the chat pipeline.

use thiserror::Error;

/// Errors that can occur while serving a chat request.
///
/// Only the first five variants may reach the HTTP response.
/// [`ChatError::Notification`] is absorbed at the gateway: notification
/// delivery is best-effort and must never fail the chat reply.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Client sent a malformed or empty message list.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Required configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The completion provider returned a non-success status.
    #[error("upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// The completion provider did not answer within the deadline.
    #[error("upstream request timed out")]
    Timeout,

    /// Transport-level failure talking to a remote service.
    #[error("network error: {0}")]
    Network(String),

    /// A notification sink failed to deliver. Internal only.
    #[error("notification delivery failed: {0}")]
    Notification(String),
}
