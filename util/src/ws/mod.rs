//! Topic-based WebSocket plumbing shared by the API crate.
//!
//! - `manager`: per-topic broadcast channels
//! - `serve`/`runtime`/`handler_trait`: the per-connection loop and its handler hooks
//! - `axum_adapter`: glue from an axum upgrade request into `serve_topic`

pub mod axum_adapter;
pub mod handler_trait;
pub mod manager;
pub mod runtime;
pub mod serve;

pub use manager::WebSocketManager;

use chrono::Utc;
use serde::Serialize;

/// Standard event envelope sent over WebSocket topics.
#[derive(Serialize)]
pub struct EventEnvelope<'a, T> {
    #[serde(rename = "type")]
    pub r#type: &'static str,
    pub event: &'a str,
    pub topic: &'a str,
    pub payload: T,
    pub ts: String,
}

/// Broadcast a JSON-serialized `EventEnvelope` on `topic`. Returns the receiver count.
pub async fn emit<T: Serialize>(
    ws: &WebSocketManager,
    topic: &str,
    event: &str,
    payload: &T,
) -> usize {
    match envelope_json(topic, event, payload) {
        Some(json) => ws.broadcast(topic, json).await,
        None => {
            tracing::warn!(topic, event, "Dropping event that failed to serialize");
            0
        }
    }
}

/// Serialize an envelope without sending it (used for direct replies to one client).
pub fn envelope_json<T: Serialize>(topic: &str, event: &str, payload: &T) -> Option<String> {
    let env = EventEnvelope {
        r#type: "event",
        event,
        topic,
        payload,
        ts: Utc::now().to_rfc3339(),
    };
    serde_json::to_string(&env).ok()
}
