use axum::{
    Extension,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
};
use std::sync::Arc;
use util::ws::{axum_adapter::ws_route, serve::WsServerOptions};

use super::topics::attendance_live_topic;
use super::ws_handlers::LiveRosterWsHandler;
use crate::auth::AuthUser;
use crate::state::AppState;

/// GET /ws/attendance/live
///
/// Admin observers receive an `attendance.roster_snapshot` on connect and an
/// `attendance.roster_changed` after every check-in or check-out.
pub async fn live_roster_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    let handler = Arc::new(LiveRosterWsHandler::new(app_state.attendance().clone()));

    ws_route(
        ws,
        app_state.ws().clone(),
        Some(claims.sub),
        attendance_live_topic,
        handler,
        WsServerOptions::default(),
    )
    .await
}
