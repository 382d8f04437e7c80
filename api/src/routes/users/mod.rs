use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;
use axum::{Router, middleware::from_fn, routing::get};

pub mod get;
pub mod put;

/// `/users` routes.
///
/// The directory is admin-only. `/profile` is the caller's own account.
pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get::list_users).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/profile",
            get(get::get_profile)
                .put(put::update_profile)
                .route_layer(from_fn(allow_authenticated)),
        )
}
