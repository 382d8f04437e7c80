use std::sync::Arc;

use sea_orm::DatabaseConnection;
use services::{
    AttendancePolicy, AttendanceService,
    roster::RosterPublisher,
    slot_service::{DbSlotRegistry, SlotRegistry},
};
use util::ws::WebSocketManager;

use crate::ws::attendance::emit::WsRosterPublisher;

/// Everything a handler needs, built once in `main` and cloned per request.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    ws: WebSocketManager,
    attendance: AttendanceService,
}

impl AppState {
    /// Wires the attendance manager to the slots table and the live WebSocket feed.
    pub fn new(db: DatabaseConnection, ws: WebSocketManager, policy: AttendancePolicy) -> Self {
        let slots: Arc<dyn SlotRegistry> = Arc::new(DbSlotRegistry::new(db.clone()));
        let publisher: Arc<dyn RosterPublisher> = Arc::new(WsRosterPublisher::spawn(
            ws.clone(),
            db.clone(),
            policy.store_timeout,
        ));
        let attendance = AttendanceService::new(db.clone(), slots, publisher, policy);
        Self { db, ws, attendance }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn ws(&self) -> &WebSocketManager {
        &self.ws
    }

    pub fn attendance(&self) -> &AttendanceService {
        &self.attendance
    }
}
