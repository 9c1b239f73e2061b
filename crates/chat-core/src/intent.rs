//! Meeting/booking intent detection.
//!
//! A small phrase grammar over lowercased text. Two families match:
//! verb + optional article + object ("book a call", "set up demo") and
//! standalone nouns ("discovery call", "talk to your team"). The gateway
//! only fires a notification when intent appears for the first time in a
//! conversation, so detection is paired with a de-duplication pass over
//! earlier user turns.

use crate::message::{ChatMessage, Role};

const INTENT_VERBS: &[&str] = &["book", "schedule", "arrange", "set up"];
const INTENT_OBJECTS: &[&str] = &["call", "meeting", "consultation", "demo"];
const INTENT_PHRASES: &[&str] = &[
    "consultation",
    "discovery call",
    "strategy call",
    "talk to you",
    "talk to your team",
];

/// Does a single message express booking intent?
pub fn matches_meeting_intent(content: &str) -> bool {
    let text = content.to_lowercase();

    for phrase in INTENT_PHRASES {
        if text.contains(phrase) {
            return true;
        }
    }

    for verb in INTENT_VERBS {
        for object in INTENT_OBJECTS {
            if text.contains(&format!("{verb} {object}"))
                || text.contains(&format!("{verb} a {object}"))
                || text.contains(&format!("{verb} an {object}"))
            {
                return true;
            }
        }
    }

    false
}

/// Has a *new* booking intent just appeared in this window?
///
/// True only when the latest user message matches and no earlier user
/// message in the window already matched. This keeps the notification from
/// re-firing on every turn of an already-flagged conversation. With no
/// earlier user message the de-duplication trivially passes.
pub fn is_new_meeting_intent(window: &[ChatMessage]) -> bool {
    let mut users = window.iter().filter(|msg| msg.role == Role::User);
    let Some(latest) = users.next_back() else {
        return false;
    };

    if !matches_meeting_intent(&latest.content) {
        return false;
    }

    !users.any(|msg| matches_meeting_intent(&msg.content))
}

/// The most recent user message in a window, if any.
pub fn latest_user_message(window: &[ChatMessage]) -> Option<&ChatMessage> {
    window.iter().rev().find(|msg| msg.role == Role::User)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_object_combinations_match() {
        for text in [
            "Can we schedule a call?",
            "I want to book a demo",
            "please arrange a meeting",
            "could you set up a consultation",
            "let's book meeting time",
            "SET UP A CALL",
        ] {
            assert!(matches_meeting_intent(text), "expected match: {text:?}");
        }
    }

    #[test]
    fn standalone_phrases_match() {
        for text in [
            "do you offer a free consultation?",
            "I'd like a discovery call",
            "maybe a strategy call next week",
            "can I talk to your team?",
        ] {
            assert!(matches_meeting_intent(text), "expected match: {text:?}");
        }
    }

    #[test]
    fn ordinary_questions_do_not_match() {
        for text in [
            "what do you charge for automation?",
            "tell me about your services",
            "how long does a project take?",
        ] {
            assert!(!matches_meeting_intent(text), "unexpected match: {text:?}");
        }
    }

    #[test]
    fn first_intent_fires() {
        let window = vec![
            ChatMessage::user("what services do you offer?"),
            ChatMessage::assistant("We build AI agents and automation."),
            ChatMessage::user("Can we schedule a call?"),
        ];
        assert!(is_new_meeting_intent(&window));
    }

    #[test]
    fn repeated_intent_does_not_refire() {
        let window = vec![
            ChatMessage::user("Can we schedule a call?"),
            ChatMessage::assistant("Of course, here is the booking link."),
            ChatMessage::user("Can we schedule a call?"),
        ];
        assert!(!is_new_meeting_intent(&window));
    }

    #[test]
    fn no_prior_user_message_passes_dedup() {
        let window = vec![ChatMessage::user("book a demo")];
        assert!(is_new_meeting_intent(&window));
    }

    #[test]
    fn latest_non_matching_message_suppresses_intent() {
        let window = vec![
            ChatMessage::user("book a demo"),
            ChatMessage::assistant("Sure!"),
            ChatMessage::user("actually, tell me about pricing first"),
        ];
        assert!(!is_new_meeting_intent(&window));
    }

    #[test]
    fn empty_window_has_no_intent() {
        assert!(!is_new_meeting_intent(&[]));
    }

    #[test]
    fn latest_user_message_skips_assistant_turns() {
        let window = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
        ];
        assert_eq!(latest_user_message(&window).unwrap().content, "first");
        assert!(latest_user_message(&[]).is_none());
    }
}
