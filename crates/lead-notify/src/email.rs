//! Transactional email sink (Resend-style API).

use std::time::Duration;

use async_trait::async_trait;
use chat_core::ChatError;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::EmailConfig;
use crate::payload::LeadNotification;
use crate::sink::NotificationSink;

const EMAIL_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_EMAIL_API_URL: &str = "https://api.resend.com/emails";

const EMAIL_SUBJECT: &str = "New meeting request from site chat";

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: String,
}

/// Sends the notification as a plain-text email through a transactional
/// provider with bearer authentication.
pub struct EmailSink {
    client: Client,
    config: EmailConfig,
    api_url: String,
}

impl EmailSink {
    /// Create an email sink from a complete config trio.
    pub fn new(client: Client, config: EmailConfig) -> Self {
        Self {
            client,
            config,
            api_url: DEFAULT_EMAIL_API_URL.to_string(),
        }
    }

    /// Override the provider URL (used by tests).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

#[async_trait]
impl NotificationSink for EmailSink {
    async fn deliver(&self, payload: &LeadNotification) -> Result<(), ChatError> {
        debug!(to = %self.config.to, "Sending lead notification email");

        let body = EmailRequest {
            from: &self.config.from,
            to: &self.config.to,
            subject: EMAIL_SUBJECT,
            text: payload.to_email_text(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .timeout(EMAIL_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Notification(format!("email request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Notification(format!(
                "email provider returned {}",
                status.as_u16()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "email"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_request_shape() {
        let body = EmailRequest {
            from: "chat@example.com",
            to: "sales@example.com",
            subject: EMAIL_SUBJECT,
            text: "body".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["from"], "chat@example.com");
        assert_eq!(json["to"], "sales@example.com");
        assert_eq!(json["subject"], EMAIL_SUBJECT);
        assert_eq!(json["text"], "body");
    }
}
