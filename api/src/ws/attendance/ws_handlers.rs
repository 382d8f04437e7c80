use serde::Deserialize;
use services::AttendanceService;
use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;

use super::emit::RosterSnapshotEvent;
use crate::ws::core::event::Event;

/// Messages an observer may send. `{"type":"ping"}` is answered by the socket loop.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiveRosterIncoming {
    /// Ask for a fresh snapshot, e.g. after a reconnect or a lag warning.
    Refresh,
}

pub struct LiveRosterWsHandler {
    attendance: AttendanceService,
}

impl LiveRosterWsHandler {
    pub fn new(attendance: AttendanceService) -> Self {
        Self { attendance }
    }

    async fn send_snapshot(&self, ctx: &WsContext) {
        match self.attendance.roster_snapshot().await {
            Ok(roster) => {
                let _ = ctx
                    .reply_event(RosterSnapshotEvent::NAME, &RosterSnapshotEvent { roster })
                    .await;
            }
            Err(e) => tracing::warn!(
                user_id = ?ctx.user_id,
                error = %e,
                "could not load roster snapshot for observer"
            ),
        }
    }
}

impl WsHandler for LiveRosterWsHandler {
    type In = LiveRosterIncoming;

    async fn on_open(&self, ctx: &WsContext) {
        let observers = ctx.ws.subscriber_count(&ctx.topic).await;
        tracing::info!(user_id = ?ctx.user_id, observers, "live roster observer connected");
        self.send_snapshot(ctx).await;
    }

    async fn on_message(&self, ctx: &WsContext, msg: Self::In) {
        match msg {
            LiveRosterIncoming::Refresh => self.send_snapshot(ctx).await,
        }
    }

    async fn on_close(&self, ctx: &WsContext) {
        tracing::info!(user_id = ?ctx.user_id, "live roster observer left");
    }
}
