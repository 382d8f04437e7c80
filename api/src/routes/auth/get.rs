use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use db::models::user::Model as User;
use serde::Serialize;
use services::user_service::UserService;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::user_failure;
use crate::state::AppState;

#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            admin: user.admin,
            phone: user.phone,
            address: user.address,
            created_at: Some(user.created_at),
        }
    }
}

/// GET /api/auth/me
///
/// Returns the account behind the bearer token.
pub async fn me(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    match UserService::get(state.db(), claims.sub).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User data retrieved successfully",
            )),
        ),
        Err(e) => user_failure(e),
    }
}
