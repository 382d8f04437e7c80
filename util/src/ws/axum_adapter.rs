use super::WebSocketManager;
use super::handler_trait::WsHandler;
use super::serve::{WsServerOptions, serve_topic};
use axum::{
    extract::{WebSocketUpgrade, ws::WebSocket},
    response::IntoResponse,
};
use std::sync::Arc;

/// Upgrade the request and hand the socket to `serve_topic`.
///
/// `topic_fn` is evaluated once the upgrade completes; `user_id` is carried into
/// the handler context for logging and per-user replies.
pub async fn ws_route<H, FTopic>(
    ws: WebSocketUpgrade,
    manager: WebSocketManager,
    user_id: Option<i64>,
    topic_fn: FTopic,
    handler: Arc<H>,
    opts: WsServerOptions,
) -> impl IntoResponse
where
    H: WsHandler,
    FTopic: Fn() -> String + Send + 'static,
{
    ws.on_upgrade(move |socket: WebSocket| {
        let topic = topic_fn();
        async move {
            serve_topic(socket, manager, topic, user_id, handler, opts).await;
        }
    })
}
