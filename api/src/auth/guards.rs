use crate::auth::claims::AuthUser;
use crate::response::ApiResponse;
use axum::{
    Json,
    body::Body,
    extract::FromRequestParts,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

#[derive(serde::Serialize, Default)]
pub struct Empty;

type Rejection = (StatusCode, Json<ApiResponse<Empty>>);

/// Validates the token and stores the `AuthUser` in the request extensions.
async fn extract_and_insert_authuser(req: Request<Body>) -> Result<(Request<Body>, AuthUser), Rejection> {
    let (mut parts, body) = req.into_parts();
    let user = AuthUser::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error_with_code(
                    "Authentication required",
                    "unauthorized",
                )),
            )
        })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user.clone());
    Ok((req, user))
}

/// Basic guard to ensure the request is authenticated.
pub async fn allow_authenticated(req: Request<Body>, next: Next) -> Result<Response, Rejection> {
    let (req, _user) = extract_and_insert_authuser(req).await?;
    Ok(next.run(req).await)
}

/// Admin-only guard.
pub async fn allow_admin(req: Request<Body>, next: Next) -> Result<Response, Rejection> {
    let (req, user) = extract_and_insert_authuser(req).await?;

    if !user.0.admin {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error_with_code(
                "Admin access required",
                "forbidden",
            )),
        ));
    }

    Ok(next.run(req).await)
}
