//! OpenAI-compatible completion client.
//!
//! [`OpenAiBrain`] implements [`chat_core::CompletionBackend`] against any
//! endpoint speaking the `/v1/chat/completions` protocol. The call is bounded
//! by a hard wall-clock timeout; on expiry the in-flight request is dropped
//! and the failure is classified as [`chat_core::ChatError::Timeout`] so the
//! gateway can surface it distinctly from provider failures.

mod api_types;
mod brain;
mod config;

pub use api_types::{
    ApiErrorBody, ApiErrorDetails, ChatCompletionRequest, ChatCompletionResponse, Choice,
    ResponseMessage, Usage, WireMessage,
};
pub use brain::{OpenAiBrain, FALLBACK_REPLY};
pub use config::{OpenAiConfig, OpenAiConfigBuilder, DEFAULT_PROMPT_FILE};
