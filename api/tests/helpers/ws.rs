use axum::Router;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};
use url::Url;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serves `app` on a random local port.
pub async fn spawn_server(app: Router) -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    addr
}

/// Connects to `/ws/{path}?token=...`.
pub async fn connect_ws(
    addr: &std::net::SocketAddr,
    path: &str,
    token: &str,
) -> Result<(Client, axum::http::Response<Option<Vec<u8>>>), tokio_tungstenite::tungstenite::Error> {
    let url = Url::parse(&format!("ws://{addr}/ws/{path}?token={token}")).unwrap();
    let req = url.to_string().into_client_request().unwrap();
    connect_async(req).await
}

/// Next JSON text frame, skipping pings. Panics after two seconds.
pub async fn next_event(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("ws error");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
