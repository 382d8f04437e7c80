use sea_orm::DatabaseConnection;
use serde::Serialize;
use services::roster::{
    RosterChangeKind, RosterDelta, RosterEntry, RosterPublisher, load_roster,
};
use std::time::Duration;
use tokio::sync::mpsc;
use util::ws::WebSocketManager;

use super::topics::attendance_live_topic;
use crate::ws::core::{envelope, event::Event};

/// `attendance.roster_changed`: what happened plus the roster afterwards.
#[derive(Debug, Serialize)]
pub struct RosterChangedEvent {
    pub kind: RosterChangeKind,
    pub session_id: i64,
    pub user_id: i64,
    pub roster: Vec<RosterEntry>,
}

impl Event for RosterChangedEvent {
    const NAME: &'static str = "attendance.roster_changed";
    fn topic_path(&self) -> String {
        attendance_live_topic()
    }
}

impl RosterChangedEvent {
    pub fn new(delta: RosterDelta, roster: Vec<RosterEntry>) -> Self {
        Self {
            kind: delta.kind,
            session_id: delta.session_id,
            user_id: delta.user_id,
            roster,
        }
    }
}

/// `attendance.roster_snapshot`: sent to one client right after it connects.
#[derive(Debug, Serialize)]
pub struct RosterSnapshotEvent {
    pub roster: Vec<RosterEntry>,
}

impl Event for RosterSnapshotEvent {
    const NAME: &'static str = "attendance.roster_snapshot";
    fn topic_path(&self) -> String {
        attendance_live_topic()
    }
}

/// Publishes roster changes on the live topic.
///
/// `publish` only enqueues. A single forwarding task loads the roster and
/// broadcasts, one delta at a time, so events keep their order and neither a slow
/// roster read nor a slow socket can hold up a check-in.
pub struct WsRosterPublisher {
    tx: mpsc::UnboundedSender<RosterDelta>,
}

impl WsRosterPublisher {
    /// Starts the forwarding task. Must be called inside a Tokio runtime.
    pub fn spawn(ws: WebSocketManager, db: DatabaseConnection, store_timeout: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<RosterDelta>();
        tokio::spawn(async move {
            let topic = attendance_live_topic();
            while let Some(delta) = rx.recv().await {
                if ws.subscriber_count(&topic).await == 0 {
                    continue;
                }
                match load_roster(&db, store_timeout).await {
                    Ok(roster) => {
                        let observers =
                            envelope::emit(&ws, &RosterChangedEvent::new(delta, roster)).await;
                        tracing::debug!(session_id = delta.session_id, observers, "roster change broadcast");
                    }
                    Err(e) => tracing::warn!(
                        session_id = delta.session_id,
                        error = %e,
                        "roster snapshot failed; change not published"
                    ),
                }
            }
            tracing::debug!("roster publisher stopped");
        });
        Self { tx }
    }
}

impl RosterPublisher for WsRosterPublisher {
    fn publish(&self, delta: RosterDelta) {
        if self.tx.send(delta).is_err() {
            tracing::warn!("roster publisher task is gone; dropping change");
        }
    }
}
