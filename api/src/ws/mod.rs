use axum::{Router, middleware::from_fn};

use crate::{auth::guards::allow_admin, state::AppState, ws::attendance::ws_attendance_routes};

pub mod attendance;
pub mod core;

/// `/ws/...` routes. The live roster is admin-only, so the whole tree is guarded.
pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/attendance", ws_attendance_routes())
        .route_layer(from_fn(allow_admin))
        .with_state(app_state)
}
