//! Bounding and cleaning of untrusted client input.
//!
//! The widget posts its whole transcript on every turn, so the server treats
//! the payload as hostile: wrong shapes degrade to an empty window instead of
//! erroring, and everything that survives is trimmed and bounded.

use serde_json::Value;

use crate::message::{ChatMessage, Role};

/// Maximum number of transcript entries accepted from the client.
pub const MAX_CLIENT_MESSAGES: usize = 20;

/// Maximum characters kept per message.
pub const MAX_MESSAGE_LENGTH: usize = 800;

/// Number of most-recent messages forwarded to the completion API.
pub const UPSTREAM_WINDOW: usize = 8;

/// Normalize an arbitrary JSON value claimed to be a message list.
///
/// Takes at most the last [`MAX_CLIENT_MESSAGES`] entries, drops entries with
/// an unknown role or non-string content, trims and truncates content to
/// [`MAX_MESSAGE_LENGTH`] characters, and drops entries that end up empty.
/// Truncation runs before the emptiness filter so whitespace-only content is
/// removed rather than kept as an empty message.
///
/// Never fails: a non-array input yields an empty window, which the gateway
/// maps to an invalid-input response.
pub fn normalize_messages(raw: &Value) -> Vec<ChatMessage> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    let skip = entries.len().saturating_sub(MAX_CLIENT_MESSAGES);
    let mut window = Vec::new();

    for entry in entries.iter().skip(skip) {
        let Some(role) = entry
            .get("role")
            .and_then(Value::as_str)
            .and_then(Role::parse)
        else {
            continue;
        };
        let Some(content) = entry.get("content").and_then(Value::as_str) else {
            continue;
        };

        let content = truncate_chars(content.trim(), MAX_MESSAGE_LENGTH);
        if content.is_empty() {
            continue;
        }

        window.push(ChatMessage { role, content });
    }

    window
}

/// Restrict a normalized window to the messages actually sent upstream.
///
/// Intent detection runs over the full window; the completion call only sees
/// the last [`UPSTREAM_WINDOW`] messages.
pub fn trim_for_upstream(window: &[ChatMessage]) -> &[ChatMessage] {
    let skip = window.len().saturating_sub(UPSTREAM_WINDOW);
    &window[skip..]
}

/// Truncate to at most `max_chars` characters (not bytes).
pub(crate) fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
