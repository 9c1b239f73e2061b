//! Core types and request-sanitization logic for the site chat gateway.
//!
//! This crate provides the shared pieces used by the HTTP gateway and the
//! upstream/notification crates:
//!
//! - [`ChatMessage`] / [`Role`] - normalized conversation messages
//! - [`Lead`] - sanitized contact fields captured by the widget
//! - [`ChatError`] - error taxonomy for the whole pipeline
//! - [`CompletionBackend`] - the trait upstream completion clients implement
//! - [`normalize`] - bounding and cleaning of untrusted client input
//! - [`intent`] - meeting/booking intent detection
//!
//! # Example
//!
//! ```rust
//! use chat_core::{normalize, intent};
//!
//! let raw = serde_json::json!([
//!     {"role": "user", "content": "Can we schedule a call?"}
//! ]);
//! let window = normalize::normalize_messages(&raw);
//! assert!(intent::is_new_meeting_intent(&window));
//! ```

mod backend;
mod error;
mod lead;
mod message;

pub mod intent;
pub mod normalize;

pub use backend::CompletionBackend;
pub use error::ChatError;
pub use lead::Lead;
pub use message::{ChatMessage, Role};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
