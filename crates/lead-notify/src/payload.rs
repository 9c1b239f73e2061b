//! The notification payload.

use chat_core::Lead;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Source tag carried in every notification.
pub const NOTIFICATION_SOURCE: &str = "site-chat-widget";

/// What downstream sinks receive when a booking intent fires.
///
/// Transient: built fresh per request, sent at most once, never stored.
/// Field names are camelCase on the wire for the webhook consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotification {
    pub source: String,
    /// RFC 3339 UTC timestamp of when the intent was detected.
    pub timestamp: String,
    pub lead_name: String,
    pub lead_email: String,
    pub latest_user_message: String,
}

impl LeadNotification {
    /// Build a notification for the current request.
    pub fn new(lead: &Lead, latest_user_message: impl Into<String>) -> Self {
        Self {
            source: NOTIFICATION_SOURCE.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            lead_name: lead.name.clone(),
            lead_email: lead.email.clone(),
            latest_user_message: latest_user_message.into(),
        }
    }

    /// Plain-text rendering for the email sink body.
    pub fn to_email_text(&self) -> String {
        let name = if self.lead_name.is_empty() {
            "(not provided)"
        } else {
            &self.lead_name
        };
        let email = if self.lead_email.is_empty() {
            "(not provided)"
        } else {
            &self.lead_email
        };

        format!(
            "New meeting request from the site chat.\n\n\
             Name: {name}\n\
             Email: {email}\n\
             Message: {message}\n\
             Detected at: {timestamp}\n",
            message = self.latest_user_message,
            timestamp = self.timestamp,
        )
    }
}
