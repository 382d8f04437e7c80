use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast::error::RecvError, mpsc};

use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::runtime::WsContext;

#[derive(Debug, Clone, Copy)]
pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
        }
    }
}

/// Drives one socket subscribed to `topic` until the client leaves.
///
/// Broadcasts on the topic are forwarded to the client; client text frames are
/// parsed as `H::In` and handed to the handler. `{"type":"ping"}` is answered
/// with an app-level pong when enabled.
pub async fn serve_topic<H: WsHandler>(
    socket: WebSocket,
    manager: WebSocketManager,
    topic: String,
    user_id: Option<i64>,
    handler: Arc<H>,
    opts: WsServerOptions,
) {
    let mut rx = manager.subscribe(&topic).await;
    let (mut sink, mut socket_rx) = socket.split();

    // Outbound queue and writer task
    let (out_tx, mut out_rx) = mpsc::channel::<Message>(64);
    let writer_task = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let ctx = WsContext::new(topic.clone(), user_id, manager.clone(), out_tx.clone());

    // S→C: forward broadcasts on this topic
    let forward_task = {
        let out_tx = out_tx.clone();
        let topic = topic.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(msg) => {
                        if out_tx.send(Message::Text(msg.into())).await.is_err() {
                            tracing::info!("Client disconnected while sending to '{topic}'");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(topic = %topic, skipped, "WS subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    };

    // WS-level periodic ping
    let ping_task = {
        let out_tx = out_tx.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(opts.ws_ping_sec)).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };
    drop(out_tx);

    handler.on_open(&ctx).await;

    // C→S: parse & dispatch
    while let Some(Ok(msg)) = socket_rx.next().await {
        match msg {
            Message::Text(text) => {
                let raw = text.as_str();
                if opts.enable_app_ping && is_app_ping(raw) {
                    let pong = serde_json::json!({
                        "event": "pong",
                        "topic": ctx.topic,
                        "payload": {},
                        "ts": Utc::now().to_rfc3339(),
                    });
                    let _ = ctx.reply_text(pong.to_string()).await;
                    continue;
                }
                match serde_json::from_str::<H::In>(raw) {
                    Ok(parsed) => handler.on_message(&ctx, parsed).await,
                    Err(e) => tracing::warn!("WS invalid message on '{}': {e}", ctx.topic),
                }
            }
            Message::Ping(payload) => {
                let _ = ctx.reply_pong(payload).await;
            }
            Message::Pong(_) => {}
            Message::Binary(_) => {
                tracing::warn!("Ignoring binary on topic '{}'", ctx.topic);
            }
            Message::Close(_) => {
                handler.on_close(&ctx).await;
                break;
            }
        }
    }

    forward_task.abort();
    ping_task.abort();
    drop(ctx);
    let _ = writer_task.await;
    tracing::info!("WS session ended for topic '{topic}'");
}

fn is_app_ping(raw: &str) -> bool {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(Value::String(t)) = map.get("type") {
            return t == "ping";
        }
    }
    false
}
