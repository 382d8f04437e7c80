use axum::{
    Extension, Json, body::Bytes, extract::State, http::StatusCode, response::IntoResponse,
};
use validator::Validate;

use super::common::{CheckInRequest, CheckOutRequest, SessionResponse, parse_optional_body};
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{attendance_failure, validation_failed};
use crate::state::AppState;

fn malformed_body(e: serde_json::Error) -> (StatusCode, Json<ApiResponse<SessionResponse>>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error_with_code(
            format!("Malformed request body: {e}"),
            "invalid_body",
        )),
    )
}

/// POST /api/attendance/check-in
///
/// Opens an attendance session for the caller.
///
/// ### Request Body
/// ```json
/// {
///   "slot_id": 1,
///   "client_timestamp": "2025-10-19T09:02:11Z",
///   "location": { "lat": 28.6129, "lng": 77.2295 }
/// }
/// ```
/// Every field is optional. Without `slot_id` the configured default slot is used, if any.
///
/// ### Responses
/// - `201 Created` with the open session
/// - `400 Bad Request` `invalid_slot` when the slot is missing, unknown or inactive
/// - `403 Forbidden` `outside_geofence` when location checks are enabled and fail
/// - `409 Conflict` `already_checked_in`
/// - `503 Service Unavailable` `store_unavailable` (safe to retry)
pub async fn check_in(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> impl IntoResponse {
    let req: CheckInRequest = match parse_optional_body(&body) {
        Ok(req) => req,
        Err(e) => return malformed_body(e),
    };
    if let Err(errors) = req.validate() {
        return validation_failed::<SessionResponse>(&errors);
    }

    match state
        .attendance()
        .check_in(&user.requester(), req.into())
        .await
    {
        Ok(session) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                SessionResponse::from(session),
                "Checked in successfully",
            )),
        ),
        Err(e) => attendance_failure(e),
    }
}

/// POST /api/attendance/check-out
///
/// Closes the caller's open session.
///
/// ### Request Body (optional)
/// ```json
/// { "action": "qr", "location": { "lat": 28.6129, "lng": 77.2295 } }
/// ```
///
/// ### Responses
/// - `200 OK` with the closed session and its duration
/// - `409 Conflict` `not_checked_in`
/// - `503 Service Unavailable` `store_unavailable`
pub async fn check_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    body: Bytes,
) -> impl IntoResponse {
    let req: CheckOutRequest = match parse_optional_body(&body) {
        Ok(req) => req,
        Err(e) => return malformed_body(e),
    };
    if let Err(errors) = req.validate() {
        return validation_failed::<SessionResponse>(&errors);
    }

    match state
        .attendance()
        .check_out(&user.requester(), req.into())
        .await
    {
        Ok(session) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                SessionResponse::from(session),
                "Checked out successfully",
            )),
        ),
        Err(e) => attendance_failure(e),
    }
}
