use crate::ws::WebSocketManager;
use axum::extract::ws::{Message, Utf8Bytes};
use serde::Serialize;
use tokio::sync::mpsc;

/// The client went away before the frame could be queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientGone;

pub struct WsContext {
    pub topic: String,
    pub user_id: Option<i64>,
    pub ws: WebSocketManager,
    // enqueue frames for the writer task
    out_tx: mpsc::Sender<Message>,
}

impl WsContext {
    pub fn new(
        topic: String,
        user_id: Option<i64>,
        ws: WebSocketManager,
        out_tx: mpsc::Sender<Message>,
    ) -> Self {
        Self {
            topic,
            user_id,
            ws,
            out_tx,
        }
    }

    /// Send a *single* text frame to this client only
    pub async fn reply_text(&self, text: impl Into<Utf8Bytes>) -> Result<(), ClientGone> {
        self.send(Message::Text(text.into())).await
    }

    /// Send a JSON event envelope to this client only
    pub async fn reply_event<T: Serialize>(&self, event: &str, payload: &T) -> Result<(), ClientGone> {
        match crate::ws::envelope_json(&self.topic, event, payload) {
            Some(json) => self.reply_text(json).await,
            None => Ok(()),
        }
    }

    /// Send a WS-level pong to this client
    pub async fn reply_pong(&self, payload: bytes::Bytes) -> Result<(), ClientGone> {
        self.send(Message::Pong(payload)).await
    }

    /// Send any raw WS frame to this client
    pub async fn send(&self, msg: Message) -> Result<(), ClientGone> {
        self.out_tx.send(msg).await.map_err(|_| ClientGone)
    }
}
