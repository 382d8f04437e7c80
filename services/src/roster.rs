use chrono::{DateTime, Utc};
use db::models::attendance_session::{Model as Session, OpenSessionRow};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

use crate::error::AttendanceError;

/// One person currently in the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub session_id: i64,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub slot_id: i64,
    pub slot_name: String,
    pub check_in_at: DateTime<Utc>,
    pub duration_seconds: i64,
}

impl RosterEntry {
    pub fn from_row(row: OpenSessionRow, now: DateTime<Utc>) -> Self {
        Self {
            session_id: row.session_id,
            user_id: row.user_id,
            name: row.user_name,
            email: row.user_email,
            slot_id: row.slot_id,
            slot_name: row.slot_name,
            duration_seconds: (now - row.check_in_at).num_seconds().max(0),
            check_in_at: row.check_in_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterChangeKind {
    CheckedIn,
    CheckedOut,
}

/// What changed. Publishers attach the roster themselves when they deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RosterDelta {
    pub kind: RosterChangeKind,
    pub session_id: i64,
    pub user_id: i64,
}

/// Delivers roster changes to observers.
///
/// Called after the state change is committed. `publish` must return immediately:
/// any store reads needed for delivery happen off the request path, and delivery is
/// best-effort.
pub trait RosterPublisher: Send + Sync {
    fn publish(&self, delta: RosterDelta);
}

/// Every open session with display fields, earliest arrival first.
///
/// Bounded by `timeout`; elapsing or losing the connection is `StoreUnavailable`.
pub async fn load_roster(
    db: &DatabaseConnection,
    timeout: Duration,
) -> Result<Vec<RosterEntry>, AttendanceError> {
    let rows = tokio::time::timeout(timeout, Session::open_roster(db))
        .await
        .map_err(|_| {
            warn!(timeout_ms = timeout.as_millis() as u64, "roster read timed out");
            AttendanceError::StoreUnavailable
        })??;

    let now = Utc::now();
    Ok(rows
        .into_iter()
        .map(|row| RosterEntry::from_row(row, now))
        .collect())
}

/// Keeps every published delta in memory.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    deltas: Mutex<Vec<RosterDelta>>,
}

impl RecordingPublisher {
    pub fn deltas(&self) -> Vec<RosterDelta> {
        self.deltas
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

impl RosterPublisher for RecordingPublisher {
    fn publish(&self, delta: RosterDelta) {
        if let Ok(mut deltas) = self.deltas.lock() {
            deltas.push(delta);
        }
    }
}
