use crate::auth::guards::allow_authenticated;
use crate::state::AppState;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

pub mod get;
pub mod post;

/// `/auth` routes. Register and login are public; `me` needs a token.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(post::register))
        .route("/login", post(post::login))
        .route("/me", get(get::me).route_layer(from_fn(allow_authenticated)))
}
