use axum::{
    body::Body,
    extract::{ConnectInfo, FromRequestParts},
    http::{Method, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::TypedHeader;
use headers::{Origin, UserAgent};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::info;

use crate::auth::claims::AuthUser;

/// Logs method, path, client IP, user id (0 when anonymous), origin, user-agent,
/// status and latency for every request. CORS preflight `OPTIONS` requests are skipped.
///
/// ```ignore
/// let app = Router::new().layer(from_fn(log_request));
/// ```
///
/// The client IP is only known when the server was started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn log_request(req: Request<Body>, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    if parts.method == Method::OPTIONS {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let ip = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".into());

    let user_id = AuthUser::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|AuthUser(c)| c.sub);

    let origin = TypedHeader::<Origin>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(o)| o.to_string());

    let user_agent = TypedHeader::<UserAgent>::from_request_parts(&mut parts, &())
        .await
        .ok()
        .map(|TypedHeader(ua)| ua.to_string());

    let method = parts.method.clone();
    let path = parts.uri.path().to_owned();
    let started = Instant::now();

    let response = next.run(Request::from_parts(parts, body)).await;

    info!(
        method = %method,
        path = %path,
        ip = %ip,
        user = user_id.unwrap_or(0),
        origin = origin.unwrap_or_else(|| "unknown".into()),
        user_agent = user_agent.unwrap_or_else(|| "unknown".into()),
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );

    response
}
