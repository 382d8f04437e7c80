use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// `/slots` routes.
///
/// Listing is open to any signed-in user so clients can offer a slot picker;
/// everything else is admin-only.
pub fn slot_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(get::list_slots)
                .route_layer(from_fn(allow_authenticated))
                .merge(post(post::create_slot).route_layer(from_fn(allow_admin))),
        )
        .route(
            "/{slot_id}",
            get(get::get_slot)
                .put(put::update_slot)
                .delete(delete::delete_slot)
                .route_layer(from_fn(allow_admin)),
        )
}
