use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use services::{AttendanceError, SlotError, UserError};
use validator::ValidationErrors;

use crate::response::ApiResponse;

pub type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

/// Joins every field message into one `; `-separated string.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| {
            errs.iter()
                .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn validation_failed<T: Serialize + Default>(errors: &ValidationErrors) -> ApiResult<T> {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error_with_code(
            format_validation_errors(errors),
            "validation_failed",
        )),
    )
}

pub fn attendance_status(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::Unauthorized => StatusCode::UNAUTHORIZED,
        AttendanceError::Forbidden | AttendanceError::OutsideGeofence => StatusCode::FORBIDDEN,
        AttendanceError::InvalidSlot => StatusCode::BAD_REQUEST,
        AttendanceError::AlreadyCheckedIn | AttendanceError::NotCheckedIn => StatusCode::CONFLICT,
        AttendanceError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        AttendanceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn attendance_failure<T: Serialize + Default>(err: AttendanceError) -> ApiResult<T> {
    let status = attendance_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "attendance request failed");
    }
    let message = match &err {
        AttendanceError::Database(_) => "Internal server error".to_owned(),
        other => other.to_string(),
    };
    (
        status,
        Json(ApiResponse::error_with_code(message, err.code())),
    )
}

pub fn slot_failure<T: Serialize + Default>(err: SlotError) -> ApiResult<T> {
    let (status, code) = match &err {
        SlotError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        SlotError::Invalid(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
        SlotError::InUse => (StatusCode::CONFLICT, "slot_in_use"),
        SlotError::Database(e) => {
            tracing::error!(error = %e, "slot request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };
    let message = match &err {
        SlotError::Database(_) => "Internal server error".to_owned(),
        other => other.to_string(),
    };
    (status, Json(ApiResponse::error_with_code(message, code)))
}

pub fn user_failure<T: Serialize + Default>(err: UserError) -> ApiResult<T> {
    let (status, code) = match &err {
        UserError::EmailTaken => (StatusCode::CONFLICT, "email_taken"),
        UserError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "unauthorized"),
        UserError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
        UserError::Database(e) => {
            tracing::error!(error = %e, "user request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal")
        }
    };
    let message = match &err {
        UserError::Database(_) => "Internal server error".to_owned(),
        other => other.to_string(),
    };
    (status, Json(ApiResponse::error_with_code(message, code)))
}

/// `?page=&per_page=` on list endpoints. Both absent means "everything".
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PageQuery {
    pub fn into_page(self) -> Option<services::attendance_session::Page> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        Some(services::attendance_session::Page {
            page: self.page.unwrap_or(1),
            per_page: self.per_page.unwrap_or(20),
        })
    }
}
