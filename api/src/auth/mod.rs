pub mod claims;
pub mod extractors;
pub mod guards;
pub mod middleware;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use util::config;

/// Signs a token for `user_id` and returns it with its RFC 3339 expiry.
pub fn generate_jwt(
    user_id: i64,
    admin: bool,
) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let minutes = i64::try_from(config::jwt_duration_minutes()).unwrap_or(i64::MAX / 60_000);
    let expiry = Utc::now() + Duration::minutes(minutes);

    let claims = Claims {
        sub: user_id,
        admin,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config::jwt_secret().as_bytes()),
    )?;

    Ok((token, expiry.to_rfc3339()))
}
