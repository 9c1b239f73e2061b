//! Notification configuration.

use std::env;

use tracing::warn;
use url::Url;

/// Email sink configuration: all three fields or nothing.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Transactional email provider API key.
    pub api_key: String,
    /// Sender address.
    pub from: String,
    /// Destination address.
    pub to: String,
}

/// Configuration for the notification dispatcher. Every sink is optional;
/// an empty config is valid and means notifications are silently disabled.
#[derive(Debug, Clone, Default)]
pub struct NotifyConfig {
    /// Webhook target. Present only when the configured URL is an absolute
    /// HTTPS URL; anything else is skipped at load time.
    pub webhook_url: Option<Url>,

    /// Email sink settings. Present only when the whole trio is configured.
    pub email: Option<EmailConfig>,
}

impl NotifyConfig {
    /// Read configuration from environment variables.
    ///
    /// - `LEAD_WEBHOOK_URL` - optional; must parse as absolute HTTPS
    /// - `RESEND_API_KEY`, `LEAD_NOTIFY_FROM`, `LEAD_NOTIFY_TO` - optional,
    ///   all-or-nothing for the email sink
    ///
    /// Never fails: a malformed or non-HTTPS webhook URL and a partial
    /// email trio are both logged and dropped, not errors.
    pub fn from_env() -> Self {
        let webhook_url = env_string("LEAD_WEBHOOK_URL").and_then(|raw| parse_webhook_url(&raw));

        let email = match (
            env_string("RESEND_API_KEY"),
            env_string("LEAD_NOTIFY_FROM"),
            env_string("LEAD_NOTIFY_TO"),
        ) {
            (Some(api_key), Some(from), Some(to)) => Some(EmailConfig { api_key, from, to }),
            (None, None, None) => None,
            _ => {
                warn!("Partial email notification config, email sink disabled");
                None
            }
        };

        Self { webhook_url, email }
    }

    /// True when no sink is configured at all.
    pub fn is_empty(&self) -> bool {
        self.webhook_url.is_none() && self.email.is_none()
    }
}

/// Accept only absolute HTTPS URLs for the webhook target.
pub(crate) fn parse_webhook_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "https" => Some(url),
        Ok(url) => {
            warn!(scheme = url.scheme(), "Webhook URL is not HTTPS, skipping webhook sink");
            None
        }
        Err(err) => {
            warn!(error = %err, "Invalid webhook URL, skipping webhook sink");
            None
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
