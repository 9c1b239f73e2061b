//! Request handling for the chat gateway.
//!
//! One request flows through a fixed sequence: method check, config check,
//! input normalization, lead sanitization, intent detection, best-effort
//! notification dispatch, then the upstream completion call. Notification
//! failures are logged and swallowed here; only input, config, and upstream
//! failures reach the HTTP response.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use chat_core::{intent, normalize, ChatError, CompletionBackend, Lead};
use lead_notify::{LeadNotification, Notifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

/// Shared per-process state. Everything here is immutable configuration;
/// no request leaves any trace in it.
#[derive(Clone)]
pub struct AppState {
    /// Absent when the upstream credential is not configured.
    pub brain: Option<Arc<dyn CompletionBackend>>,
    pub notifier: Arc<Notifier>,
}

/// Inbound request body. `messages` stays loosely typed so malformed shapes
/// degrade through normalization instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Value,
    #[serde(default)]
    pub lead: Option<RawLead>,
}

/// Lead fields exactly as the client sent them, before sanitization.
#[derive(Debug, Default, Deserialize)]
pub struct RawLead {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Success response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    /// Echoed so the widget can adapt its UI without re-deriving intent.
    pub meeting_intent: bool,
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// The chat endpoint. Registered with `any()` so non-POST methods get the
/// JSON method-not-allowed body instead of a bare 405.
pub async fn chat(
    State(state): State<AppState>,
    method: Method,
    payload: Option<Json<ChatRequest>>,
) -> Result<Json<ChatResponse>, ApiError> {
    if method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let Some(brain) = state.brain.clone() else {
        return Err(ApiError::Configuration);
    };

    let request = payload.map(|Json(body)| body).unwrap_or_default();

    let window = normalize::normalize_messages(&request.messages);
    if window.is_empty() {
        return Err(ApiError::InvalidMessages);
    }

    let raw_lead = request.lead.unwrap_or_default();
    let lead = Lead::sanitize(&raw_lead.name, &raw_lead.email);

    // Intent runs over the full normalized window; the upstream call sees
    // the shorter trimmed one.
    let meeting_intent = intent::is_new_meeting_intent(&window);

    if meeting_intent {
        notify_lead(&state.notifier, &lead, &window).await;
    }

    let reply = brain
        .complete(normalize::trim_for_upstream(&window))
        .await?;

    Ok(Json(ChatResponse {
        reply,
        meeting_intent,
    }))
}

/// Dispatch the lead notification, absorbing any failure. This is the one
/// boundary where an error is logged and dropped: delivery must never gate
/// the chat reply.
async fn notify_lead(notifier: &Notifier, lead: &Lead, window: &[chat_core::ChatMessage]) {
    let latest = intent::latest_user_message(window)
        .map(|msg| msg.content.clone())
        .unwrap_or_default();

    let payload = LeadNotification::new(lead, latest);
    info!(
        has_name = !lead.name.is_empty(),
        has_email = !lead.email.is_empty(),
        "Meeting intent detected, dispatching lead notification"
    );

    if let Err(err) = notifier.dispatch(&payload).await {
        warn!(error = %err, "Lead notification dispatch failed");
    }
}

/// Terminal error classifications for the HTTP surface.
#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    MethodNotAllowed,
    InvalidMessages,
    Configuration,
    Upstream,
    Timeout,
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::InvalidMessages => StatusCode::BAD_REQUEST,
            ApiError::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
            ApiError::Timeout => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::InvalidMessages => "Invalid messages array",
            ApiError::Configuration => "Server configuration error",
            ApiError::Upstream => "AI provider error",
            ApiError::Timeout => "AI request timeout",
            ApiError::Internal => "Internal server error",
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidInput(_) => ApiError::InvalidMessages,
            ChatError::Configuration(detail) => {
                warn!(%detail, "Configuration error");
                ApiError::Configuration
            }
            ChatError::Upstream { status, message } => {
                warn!(status, %message, "Completion provider error");
                ApiError::Upstream
            }
            ChatError::Timeout => {
                warn!("Completion request timed out");
                ApiError::Timeout
            }
            ChatError::Network(detail) => {
                warn!(%detail, "Network failure during completion");
                ApiError::Internal
            }
            // Notification failures are absorbed before this point; if one
            // gets here it is a bug, surface it generically.
            ChatError::Notification(detail) => {
                warn!(%detail, "Notification error escaped the dispatch boundary");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message() });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_core::{async_trait, ChatMessage};
    use lead_notify::NotificationSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that records the window it was called with.
    struct ScriptedBrain {
        reply: Result<String, fn() -> ChatError>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedBrain {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> ChatError) -> Self {
            Self {
                reply: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBrain {
        async fn complete(&self, window: &[ChatMessage]) -> Result<String, ChatError> {
            self.seen.lock().unwrap().push(window.to_vec());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(make) => Err(make()),
            }
        }

        fn name(&self) -> &str {
            "ScriptedBrain"
        }
    }

    struct FailingSink {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl NotificationSink for FailingSink {
        async fn deliver(&self, _payload: &LeadNotification) -> Result<(), ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ChatError::Notification("sink down".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn state_with(brain: Option<Arc<dyn CompletionBackend>>, notifier: Notifier) -> AppState {
        AppState {
            brain,
            notifier: Arc::new(notifier),
        }
    }

    fn request(messages: Value) -> Option<Json<ChatRequest>> {
        Some(Json(ChatRequest {
            messages,
            lead: None,
        }))
    }

    #[tokio::test]
    async fn get_is_method_not_allowed() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::replying("hi"))),
            Notifier::with_sinks(Vec::new()),
        );

        let err = chat(State(state), Method::GET, None).await.unwrap_err();
        assert_eq!(err, ApiError::MethodNotAllowed);
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn missing_backend_is_a_configuration_error() {
        let state = state_with(None, Notifier::with_sinks(Vec::new()));
        let body = request(serde_json::json!([{"role": "user", "content": "hi"}]));

        let err = chat(State(state), Method::POST, body).await.unwrap_err();
        assert_eq!(err, ApiError::Configuration);
        assert_eq!(err.message(), "Server configuration error");
    }

    #[tokio::test]
    async fn empty_window_is_rejected() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::replying("hi"))),
            Notifier::with_sinks(Vec::new()),
        );

        for messages in [
            Value::Null,
            serde_json::json!("not a list"),
            serde_json::json!([]),
            serde_json::json!([{"role": "wizard", "content": "hi"}]),
        ] {
            let err = chat(State(state.clone()), Method::POST, request(messages))
                .await
                .unwrap_err();
            assert_eq!(err, ApiError::InvalidMessages);
        }
    }

    #[tokio::test]
    async fn missing_body_is_rejected_as_invalid_messages() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::replying("hi"))),
            Notifier::with_sinks(Vec::new()),
        );

        let err = chat(State(state), Method::POST, None).await.unwrap_err();
        assert_eq!(err, ApiError::InvalidMessages);
    }

    #[tokio::test]
    async fn booking_message_sets_meeting_intent() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::replying("Here is the link"))),
            Notifier::with_sinks(Vec::new()),
        );
        let body = request(serde_json::json!([
            {"role": "user", "content": "I want to book a demo"}
        ]));

        let Json(response) = chat(State(state), Method::POST, body).await.unwrap();
        assert!(response.meeting_intent);
        assert_eq!(response.reply, "Here is the link");
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_reply() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::with_sinks(vec![Arc::new(FailingSink {
            calls: calls.clone(),
        }) as Arc<dyn NotificationSink>]);
        let state = state_with(Some(Arc::new(ScriptedBrain::replying("still fine"))), notifier);
        let body = request(serde_json::json!([
            {"role": "user", "content": "can we schedule a call?"}
        ]));

        let Json(response) = chat(State(state), Method::POST, body).await.unwrap();
        assert!(response.meeting_intent);
        assert_eq!(response.reply, "still fine");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn repeated_intent_does_not_dispatch_again() {
        let calls = Arc::new(AtomicUsize::new(0));
        let notifier = Notifier::with_sinks(vec![Arc::new(FailingSink {
            calls: calls.clone(),
        }) as Arc<dyn NotificationSink>]);
        let state = state_with(Some(Arc::new(ScriptedBrain::replying("ok"))), notifier);
        let body = request(serde_json::json!([
            {"role": "user", "content": "book a call please"},
            {"role": "assistant", "content": "Sure, here is the link."},
            {"role": "user", "content": "book a call please"}
        ]));

        let Json(response) = chat(State(state), Method::POST, body).await.unwrap();
        assert!(!response.meeting_intent);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_window_is_trimmed_to_eight() {
        let brain = Arc::new(ScriptedBrain::replying("ok"));
        let state = state_with(
            Some(brain.clone() as Arc<dyn CompletionBackend>),
            Notifier::with_sinks(Vec::new()),
        );
        let entries: Vec<Value> = (0..15)
            .map(|i| serde_json::json!({"role": "user", "content": format!("m{i}")}))
            .collect();

        chat(State(state), Method::POST, request(Value::Array(entries)))
            .await
            .unwrap();

        let seen = brain.seen.lock().unwrap();
        assert_eq!(seen[0].len(), normalize::UPSTREAM_WINDOW);
        assert_eq!(seen[0][0].content, "m7");
    }

    #[tokio::test]
    async fn timeout_maps_to_timeout_error() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::failing(|| ChatError::Timeout))),
            Notifier::with_sinks(Vec::new()),
        );
        let body = request(serde_json::json!([{"role": "user", "content": "hi"}]));

        let err = chat(State(state), Method::POST, body).await.unwrap_err();
        assert_eq!(err, ApiError::Timeout);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "AI request timeout");
    }

    #[tokio::test]
    async fn provider_failure_maps_to_bad_gateway() {
        let state = state_with(
            Some(Arc::new(ScriptedBrain::failing(|| ChatError::Upstream {
                status: 429,
                message: "rate limited".to_string(),
            }))),
            Notifier::with_sinks(Vec::new()),
        );
        let body = request(serde_json::json!([{"role": "user", "content": "hi"}]));

        let err = chat(State(state), Method::POST, body).await.unwrap_err();
        assert_eq!(err, ApiError::Upstream);
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.message(), "AI provider error");
    }

    #[tokio::test]
    async fn error_responses_carry_the_json_envelope() {
        let response = ApiError::Timeout.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "AI request timeout");
    }
}
