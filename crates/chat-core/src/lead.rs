//! Lead contact fields and their sanitization.

use serde::{Deserialize, Serialize};

use crate::normalize::truncate_chars;

/// Maximum characters kept for a lead name.
pub const MAX_NAME_LENGTH: usize = 80;

/// Maximum characters kept for a lead email.
pub const MAX_EMAIL_LENGTH: usize = 120;

/// Contact fields the widget captures during a conversation.
///
/// Both fields are optional and arrive as free text, so they are rebuilt
/// from scratch on every request and never persisted server-side. The
/// upstream widget extracts them heuristically from chat text; treat them
/// as best-effort hints, not verified identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl Lead {
    /// Build a sanitized lead from raw client-supplied fields.
    ///
    /// The name keeps only letters, spaces, hyphens, and apostrophes. The
    /// email is trimmed, lowercased, and cleared entirely if it does not
    /// look like `local@domain.tld` - an invalid email is dropped, never an
    /// error.
    pub fn sanitize(name: &str, email: &str) -> Self {
        Self {
            name: sanitize_name(name),
            email: sanitize_email(email),
        }
    }

    /// True when neither field survived sanitization.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty()
    }
}

fn sanitize_name(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|ch| ch.is_alphabetic() || *ch == ' ' || *ch == '-' || *ch == '\'')
        .collect();
    truncate_chars(filtered.trim(), MAX_NAME_LENGTH)
        .trim()
        .to_string()
}

fn sanitize_email(raw: &str) -> String {
    let email = truncate_chars(raw.trim(), MAX_EMAIL_LENGTH).to_lowercase();
    if is_plausible_email(&email) {
        email
    } else {
        String::new()
    }
}

/// Structural check for `local@domain.tld`. Deliberately loose: the goal is
/// to reject garbage before it reaches a notification sink, not to enforce
/// RFC 5322.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // The domain needs an interior dot: "a.b", not ".b" or "a.".
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
