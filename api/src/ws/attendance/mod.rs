use crate::state::AppState;
use axum::{Router, routing::get};

pub mod emit;
pub mod handlers;
pub mod topics;
pub mod ws_handlers;

use handlers::live_roster_ws_handler;

pub fn ws_attendance_routes() -> Router<AppState> {
    Router::new().route("/live", get(live_roster_ws_handler))
}
