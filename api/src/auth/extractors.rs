use axum::{
    extract::{FromRequestParts, Query},
    http::{StatusCode, request::Parts},
};
use axum_extra::extract::TypedHeader;
use headers::{Authorization, authorization::Bearer};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use util::config;

use crate::auth::claims::{AuthUser, Claims};

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Extracts `AuthUser` from a Bearer token.
///
/// The `Authorization` header is preferred. Browsers cannot set headers on a
/// WebSocket handshake, so a `?token=` query parameter is accepted as a fallback.
///
/// # Errors
/// `401 Unauthorized` if no token is present, or it is malformed, forged or expired.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
        {
            Ok(TypedHeader(Authorization(bearer))) => bearer.token().to_owned(),
            Err(_) => Query::<TokenQuery>::from_request_parts(parts, state)
                .await
                .ok()
                .and_then(|Query(q)| q.token)
                .ok_or((
                    StatusCode::UNAUTHORIZED,
                    "Missing or invalid Authorization header",
                ))?,
        };

        let secret = config::jwt_secret();
        if secret.is_empty() {
            return Err((StatusCode::UNAUTHORIZED, "Token verification unavailable"));
        }

        let token_data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid or expired token"))?;

        Ok(AuthUser(token_data.claims))
    }
}
