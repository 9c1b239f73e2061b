//! The notification dispatcher.

use std::sync::Arc;

use chat_core::ChatError;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::NotifyConfig;
use crate::email::EmailSink;
use crate::payload::LeadNotification;
use crate::sink::NotificationSink;
use crate::webhook::WebhookSink;

/// Walks the configured sinks in order and reports the first failure.
///
/// The dispatcher itself is allowed to fail; the *gateway* is the layer
/// that absorbs [`ChatError::Notification`] so the chat reply is never
/// blocked on delivery. Zero sinks is a valid configuration: dispatch is
/// then a no-op.
pub struct Notifier {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl Notifier {
    /// Build a notifier from configuration, sharing one HTTP client across
    /// sinks.
    pub fn from_config(config: &NotifyConfig) -> Self {
        let client = Client::new();
        let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();

        if let Some(url) = config.webhook_url.clone() {
            sinks.push(Arc::new(WebhookSink::new(client.clone(), url)));
        }

        if let Some(email) = config.email.clone() {
            sinks.push(Arc::new(EmailSink::new(client, email)));
        }

        info!(sinks = sinks.len(), "Lead notifier configured");
        Self { sinks }
    }

    /// Build a notifier from explicit sinks (used by tests).
    pub fn with_sinks(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    /// Number of configured sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Deliver the payload to every sink, sequentially, at most once each.
    ///
    /// Stops at the first failing sink. No retry: a lost notification is an
    /// accepted trade-off for keeping the chat path available.
    pub async fn dispatch(&self, payload: &LeadNotification) -> Result<(), ChatError> {
        for sink in &self.sinks {
            sink.deliver(payload).await?;
            debug!(sink = sink.name(), "Lead notification delivered");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{async_trait, Lead};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct RecordingSink {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn deliver(&self, _payload: &LeadNotification) -> Result<(), ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(ChatError::Notification("sink down".to_string()))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn payload() -> LeadNotification {
        LeadNotification::new(&Lead::sanitize("Ann", "ann@example.com"), "book a demo")
    }

    #[tokio::test]
    async fn dispatch_with_no_sinks_is_a_noop() {
        let notifier = Notifier::with_sinks(Vec::new());
        assert!(notifier.dispatch(&payload()).await.is_ok());
    }

    #[tokio::test]
    async fn dispatch_calls_every_sink_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let sinks: Vec<Arc<dyn NotificationSink>> = vec![
            Arc::new(RecordingSink {
                calls: calls.clone(),
                fail: false,
            }),
            Arc::new(RecordingSink {
                calls: calls.clone(),
                fail: false,
            }),
        ];
        let notifier = Notifier::with_sinks(sinks);

        notifier.dispatch(&payload()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn first_failure_short_circuits() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let sinks: Vec<Arc<dyn NotificationSink>> = vec![
            Arc::new(RecordingSink {
                calls: first.clone(),
                fail: true,
            }),
            Arc::new(RecordingSink {
                calls: second.clone(),
                fail: false,
            }),
        ];
        let notifier = Notifier::with_sinks(sinks);

        let err = notifier.dispatch(&payload()).await.unwrap_err();
        assert!(matches!(err, ChatError::Notification(_)));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn notifier_from_empty_config_has_no_sinks() {
        let notifier = Notifier::from_config(&NotifyConfig::default());
        assert_eq!(notifier.sink_count(), 0);
    }

    #[test]
    fn notifier_from_https_webhook_config_has_one_sink() {
        let config = NotifyConfig {
            webhook_url: crate::config::parse_webhook_url("https://hooks.example.com/lead"),
            email: None,
        };
        let notifier = Notifier::from_config(&config);
        assert_eq!(notifier.sink_count(), 1);
    }
}
