//! Best-effort notification delivery for meeting-intent leads.
//!
//! When the gateway detects a fresh booking intent it hands a
//! [`LeadNotification`] to the [`Notifier`], which walks its configured
//! sinks (webhook, transactional email) in order. Delivery is at-most-once
//! with no retry and no queue: a transient failure means a lost
//! notification, never a failed chat reply. The gateway logs dispatch
//! failures and moves on.

mod config;
mod dispatcher;
mod email;
mod payload;
mod sink;
mod webhook;

pub use config::{EmailConfig, NotifyConfig};
pub use dispatcher::Notifier;
pub use email::EmailSink;
pub use payload::{LeadNotification, NOTIFICATION_SOURCE};
pub use sink::NotificationSink;
pub use webhook::WebhookSink;
