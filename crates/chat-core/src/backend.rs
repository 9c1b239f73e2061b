//! The trait upstream completion clients implement.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::message::ChatMessage;

/// A completion backend turns a conversation window into a reply.
///
/// The gateway depends on this trait rather than a concrete client so tests
/// can drive the full request pipeline without a network.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Produce the assistant's reply for the given window.
    ///
    /// The window is already normalized and trimmed; implementations are
    /// responsible for prepending their own system prompt.
    async fn complete(&self, window: &[ChatMessage]) -> Result<String, ChatError>;

    /// Name of this backend, for logging.
    fn name(&self) -> &str;
}
