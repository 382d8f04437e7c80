use sea_orm::DbErr;
use thiserror::Error;

/// Failures of the attendance session manager.
///
/// Every variant except `StoreUnavailable` is final for the request that produced it.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// The caller's account no longer exists.
    #[error("Authentication required")]
    Unauthorized,

    #[error("You are not allowed to access this resource")]
    Forbidden,

    #[error("Slot is missing, unknown or inactive")]
    InvalidSlot,

    #[error("Location is outside the library geofence")]
    OutsideGeofence,

    #[error("You already have an open attendance session")]
    AlreadyCheckedIn,

    #[error("You have no open attendance session")]
    NotCheckedIn,

    #[error("Attendance store is unavailable, try again")]
    StoreUnavailable,

    #[error("Database error: {0}")]
    Database(#[source] DbErr),
}

impl AttendanceError {
    /// Stable machine-readable kind, surfaced as `code` in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::InvalidSlot => "invalid_slot",
            Self::OutsideGeofence => "outside_geofence",
            Self::AlreadyCheckedIn => "already_checked_in",
            Self::NotCheckedIn => "not_checked_in",
            Self::StoreUnavailable => "store_unavailable",
            Self::Database(_) => "internal",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable)
    }
}

impl From<DbErr> for AttendanceError {
    fn from(err: DbErr) -> Self {
        if is_connection_error(&err) {
            Self::StoreUnavailable
        } else {
            Self::Database(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("Slot not found")]
    NotFound,

    #[error("{0}")]
    Invalid(String),

    #[error("Slot has attendance sessions; deactivate it instead")]
    InUse,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("A user with this email already exists")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub(crate) fn is_connection_error(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
