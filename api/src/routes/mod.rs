//! HTTP route entry point for `/api/...`.
//!
//! - `/health` → liveness check (public)
//! - `/auth` → register and login (public), `me` (authenticated)
//! - `/attendance` → check-in, check-out, history, live roster (authenticated; live is admin-only)
//! - `/slots` → slot listing (authenticated) and management (admin)
//! - `/users` → user directory (admin) and own profile (authenticated)

use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{Router, middleware::from_fn};

pub mod attendance;
pub mod auth;
pub mod common;
pub mod health;
pub mod slots;
pub mod users;

use attendance::attendance_routes;
use auth::auth_routes;
use health::health_routes;
use slots::slot_routes;
use users::users_routes;

/// Builds every `/api` route with its access guard and binds the state.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/slots", slot_routes())
        .nest("/users", users_routes())
        .with_state(app_state)
}
