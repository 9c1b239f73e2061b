//! Configuration for the completion client.

use std::env;
use std::fs;
use std::path::Path;

use chat_core::ChatError;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Built-in system prompt used when neither the env var nor the prompt file
/// is present. The wording is deployment configuration, not a contract;
/// deployments are expected to override it.
const DEFAULT_SYSTEM_PROMPT: &str = "You are a professional sales assistant \
for an AI automation agency. Answer questions about the services, be concise \
and friendly, and gently guide the user to book a free consultation. Keep \
responses under 3 sentences.";

/// Configuration for [`crate::OpenAiBrain`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Completion API base URL.
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model name to request.
    pub model: String,

    /// System prompt prepended to every window.
    pub system_prompt: String,

    /// Maximum tokens for the reply.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Wall-clock deadline for the upstream call, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 150,
            temperature: 0.7,
            timeout_ms: 12_000,
        }
    }
}

impl OpenAiConfig {
    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `OPENAI_API_KEY` - API key for authentication
    ///
    /// Optional:
    /// - `OPENAI_API_URL` - base URL (default: https://api.openai.com)
    /// - `OPENAI_MODEL` - model name (default: gpt-3.5-turbo)
    /// - `OPENAI_MAX_TOKENS` - max reply tokens (default: 150)
    /// - `OPENAI_TEMPERATURE` - sampling temperature (default: 0.7)
    /// - `OPENAI_TIMEOUT_MS` - upstream deadline (default: 12000)
    /// - `CHAT_SYSTEM_PROMPT` - system prompt (overrides prompt file)
    /// - `CHAT_PROMPT_FILE` - prompt file path (default: SYSTEM_PROMPT.md)
    ///
    /// System prompt priority: env var, then prompt file, then built-in
    /// default.
    pub fn from_env() -> Result<Self, ChatError> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| ChatError::Configuration("OPENAI_API_KEY not set".to_string()))?;

        let api_url =
            env::var("OPENAI_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());

        let system_prompt = if let Ok(prompt) = env::var("CHAT_SYSTEM_PROMPT") {
            prompt
        } else {
            let prompt_file =
                env::var("CHAT_PROMPT_FILE").unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
        };

        let max_tokens = env::var("OPENAI_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(150);

        let temperature = env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.7);

        let timeout_ms = env::var("OPENAI_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(12_000);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            timeout_ms,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }
}

/// Builder for [`OpenAiConfig`].
#[derive(Debug, Default)]
pub struct OpenAiConfigBuilder {
    config: OpenAiConfig,
}

impl OpenAiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the max reply tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = temp;
        self
    }

    /// Set the upstream deadline in milliseconds.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeout_ms = ms;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> OpenAiConfig {
        self.config
    }
}

fn load_prompt_file(path: &str) -> Option<String> {
    let path = Path::new(path);
    if !path.exists() {
        return None;
    }
    let contents = fs::read_to_string(path).ok()?;
    let trimmed = contents.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
