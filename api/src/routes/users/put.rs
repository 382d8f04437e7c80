use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::ProfileChanges;
use serde::Deserialize;
use services::user_service::UserService;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::auth::get::UserResponse;
use crate::routes::common::{user_failure, validation_failed};
use crate::state::AppState;

/// Absent fields are left alone. An empty `phone` or `address` clears it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 255, message = "Address must be at most 255 characters"))]
    pub address: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileChanges {
            name: req.name,
            phone: req.phone,
            address: req.address,
            password: req.password,
        }
    }
}

/// PUT /api/users/profile
///
/// Edits the caller's own name, contact details or password.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return validation_failed::<UserResponse>(&errors);
    }

    match UserService::update_profile(state.db(), claims.sub, req.into()).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(UserResponse::from(user), "Profile updated")),
        ),
        Err(e) => user_failure(e),
    }
}
