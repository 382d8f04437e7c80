//! `/attendance` routes. Every route requires a token; the caller's identity is
//! always taken from it, never from the request body.

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub mod common;
pub mod get;
pub mod post;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/check-in", post(post::check_in))
        .route("/check-out", post(post::check_out))
        .route("/current", get(get::current))
        .route("/history", get(get::my_history))
        .route("/history/{user_id}", get(get::user_history))
        .route("/live", get(get::live))
}
