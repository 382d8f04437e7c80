use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use services::user_service::UserService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::auth::get::UserResponse;
use crate::routes::common::user_failure;
use crate::state::AppState;

/// GET /api/users
///
/// Every account, oldest first. Password hashes are never included.
pub async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match UserService::list(state.db()).await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                users
                    .into_iter()
                    .map(UserResponse::from)
                    .collect::<Vec<_>>(),
                "Users retrieved",
            )),
        ),
        Err(e) => user_failure(e),
    }
}

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    match UserService::get(state.db(), claims.sub).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(UserResponse::from(user), "Profile retrieved")),
        ),
        Err(e) => user_failure(e),
    }
}
