use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use chat_core::CompletionBackend;
use lead_notify::{Notifier, NotifyConfig};
use openai_brain::OpenAiBrain;
use tracing::{info, warn};

mod handlers;

use handlers::{chat, health, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let addr = env::var("CHAT_API_ADDR").unwrap_or_else(|_| "127.0.0.1:8788".to_string());

    // A missing credential is reported per request as a configuration
    // error, matching ephemeral-function deployments where the process
    // starts regardless and every invocation re-checks its environment.
    let brain: Option<Arc<dyn CompletionBackend>> = match OpenAiBrain::from_env() {
        Ok(brain) => Some(Arc::new(brain)),
        Err(err) => {
            warn!(error = %err, "Completion backend unavailable, chat requests will fail");
            None
        }
    };

    let notifier = Arc::new(Notifier::from_config(&NotifyConfig::from_env()));

    let state = AppState { brain, notifier };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/chat", any(chat))
        .with_state(state);

    let addr: SocketAddr = addr.parse().expect("Invalid CHAT_API_ADDR");
    info!(%addr, "Chat gateway listening");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
