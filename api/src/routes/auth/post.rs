use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use db::models::user::Model as User;
use serde::{Deserialize, Serialize};
use services::user_service::UserService;
use validator::Validate;

use crate::auth::generate_jwt;
use crate::response::ApiResponse;
use crate::routes::common::{user_failure, validation_failed};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct AuthResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub admin: bool,
    pub token: String,
    pub expires_at: String,
}

fn with_token(user: User) -> Result<AuthResponse, jsonwebtoken::errors::Error> {
    let (token, expires_at) = generate_jwt(user.id, user.admin)?;
    Ok(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        admin: user.admin,
        token,
        expires_at,
    })
}

fn token_failure(e: jsonwebtoken::errors::Error) -> (StatusCode, Json<ApiResponse<AuthResponse>>) {
    tracing::error!(error = %e, "token signing failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error_with_code("Could not issue token", "internal")),
    )
}

/// POST /api/auth/register
///
/// Creates a member account (never an admin) and signs them in.
///
/// ### Request Body
/// ```json
/// { "name": "Asha", "email": "asha@example.com", "password": "strongpassword" }
/// ```
///
/// ### Responses
/// - `201 Created` with `{ id, name, email, admin, token, expires_at }`
/// - `400 Bad Request` on validation failure
/// - `409 Conflict` if the email is taken (`code: "email_taken"`)
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return validation_failed::<AuthResponse>(&errors);
    }

    match UserService::register(state.db(), &req.name, &req.email, &req.password).await {
        Ok(user) => match with_token(user) {
            Ok(body) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(body, "User registered successfully")),
            ),
            Err(e) => token_failure(e),
        },
        Err(e) => user_failure(e),
    }
}

/// POST /api/auth/login
///
/// ### Request Body
/// ```json
/// { "email": "asha@example.com", "password": "strongpassword" }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ id, name, email, admin, token, expires_at }`
/// - `401 Unauthorized` for an unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return validation_failed::<AuthResponse>(&errors);
    }

    match UserService::login(state.db(), &req.email, &req.password).await {
        Ok(user) => match with_token(user) {
            Ok(body) => (
                StatusCode::OK,
                Json(ApiResponse::success(body, "Login successful")),
            ),
            Err(e) => token_failure(e),
        },
        Err(e) => user_failure(e),
    }
}
