//! Webhook sink.

use std::time::Duration;

use async_trait::async_trait;
use chat_core::ChatError;
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::payload::LeadNotification;
use crate::sink::NotificationSink;

/// Per-sink request deadline. Shorter than the upstream completion deadline
/// so a slow webhook cannot dominate the request budget.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts the notification payload as JSON to a configured HTTPS endpoint.
pub struct WebhookSink {
    client: Client,
    url: Url,
}

impl WebhookSink {
    /// Create a webhook sink for an already-validated HTTPS URL.
    pub fn new(client: Client, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn deliver(&self, payload: &LeadNotification) -> Result<(), ChatError> {
        debug!(url = %self.url, "Posting lead notification to webhook");

        let response = self
            .client
            .post(self.url.clone())
            .timeout(WEBHOOK_TIMEOUT)
            .json(payload)
            .send()
            .await
            .map_err(|e| ChatError::Notification(format!("webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::Notification(format!(
                "webhook returned {}",
                status.as_u16()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
