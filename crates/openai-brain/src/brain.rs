//! OpenAiBrain implementation.

use std::time::Duration;

use chat_core::{async_trait, ChatError, ChatMessage, CompletionBackend};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, WireMessage};
use crate::config::OpenAiConfig;

/// Reply substituted when the upstream payload has no usable content.
/// Prompting for more detail keeps the conversation moving instead of
/// failing the whole request over a malformed provider response.
pub const FALLBACK_REPLY: &str =
    "Could you tell me a bit more about what you're looking for? I'd be happy to help.";

/// A completion backend that talks to an OpenAI-compatible chat endpoint.
///
/// Stateless across calls: conversation history lives in the client widget
/// and arrives with every request, so there is nothing to track here beyond
/// the HTTP client and configuration.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ChatError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ChatError::Configuration(format!("Failed to create HTTP client: {e}")))?;

        info!(
            model = %config.model,
            timeout_ms = config.timeout_ms,
            "OpenAiBrain initialized"
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables involved.
    pub fn from_env() -> Result<Self, ChatError> {
        let config = OpenAiConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the wire messages: system prompt first, then the window.
    fn build_messages(&self, window: &[ChatMessage]) -> Vec<WireMessage> {
        let mut messages = Vec::with_capacity(window.len() + 1);
        messages.push(WireMessage::system(self.config.system_prompt.clone()));
        messages.extend(window.iter().map(WireMessage::from));
        messages
    }

    async fn chat_completion(
        &self,
        messages: Vec<WireMessage>,
    ) -> Result<ChatCompletionResponse, ChatError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, messages = request.messages.len(), "Sending completion request");

        // The per-request timeout doubles as the cancellation scope: when it
        // fires, reqwest drops the in-flight connection.
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiErrorBody>(&error_text) {
                Ok(body) => body.error.message,
                Err(_) => error_text,
            };

            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Network(format!("Failed to parse response: {e}")))?;

        Ok(completion)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBrain {
    async fn complete(&self, window: &[ChatMessage]) -> Result<String, ChatError> {
        let messages = self.build_messages(window);
        let completion = self.chat_completion(messages).await?;

        let reply = extract_reply(&completion);

        if let Some(usage) = completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage"
            );
        }

        Ok(reply)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}

fn classify_send_error(err: reqwest::Error) -> ChatError {
    if err.is_timeout() {
        ChatError::Timeout
    } else {
        ChatError::Network(format!("Failed to send request: {err}"))
    }
}

/// Pull the assistant text out of a completion, defensively. An unexpected
/// payload shape yields [`FALLBACK_REPLY`] rather than an error.
fn extract_reply(completion: &ChatCompletionResponse) -> String {
    match completion
        .choices
        .first()
        .and_then(|choice| choice.message.content.as_deref())
        .map(str::trim)
        .filter(|content| !content.is_empty())
    {
        Some(content) => content.to_string(),
        None => {
            warn!("No content in completion response, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
    }
}
