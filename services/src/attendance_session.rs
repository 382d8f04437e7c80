//! Attendance session manager.
//!
//! Owns the check-in / check-out state machine for library members. The store is the
//! only arbiter of the "one open session per user" rule: check-in relies on the partial
//! unique index and check-out on a conditional update, so concurrent requests for the
//! same user never both succeed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use db::models::{
    attendance_anomaly,
    attendance_session::{CloseDetails, Model as Session, NewSession},
    slot, user,
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use util::config::AppConfig;

use crate::error::{AttendanceError, is_unique_violation};
use crate::geofence::{GeoPoint, GeofencePolicy};
use crate::identity::Requester;
use crate::roster::{RosterChangeKind, RosterDelta, RosterEntry, RosterPublisher, load_roster};
use crate::slot_service::SlotRegistry;

/// Deployment knobs for the manager.
#[derive(Debug, Clone)]
pub struct AttendancePolicy {
    pub store_timeout: StdDuration,
    pub default_slot_id: Option<i64>,
    /// `None` disables the location check.
    pub geofence: Option<GeofencePolicy>,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            store_timeout: StdDuration::from_secs(5),
            default_slot_id: None,
            geofence: None,
        }
    }
}

impl AttendancePolicy {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let geofence = cfg.geofence_enabled.then(|| GeofencePolicy {
            center: GeoPoint::new(cfg.library_lat, cfg.library_lng),
            radius_m: cfg.geofence_radius_meters,
        });
        Self {
            store_timeout: StdDuration::from_millis(cfg.store_timeout_ms.max(1)),
            default_slot_id: cfg.default_slot_id,
            geofence,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckIn {
    pub slot_id: Option<i64>,
    /// Stored as advisory metadata only.
    pub client_timestamp: Option<DateTime<Utc>>,
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckOut {
    /// Free-form client hint such as "qr" or "manual". Logged, never interpreted.
    pub client_action: Option<String>,
    pub location: Option<GeoPoint>,
}

/// 1-based page of history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u64,
    pub per_page: u64,
}

impl Page {
    pub const MAX_PER_PAGE: u64 = 100;

    /// `(offset, limit)` with `page >= 1` and `per_page` clamped to `1..=100`.
    pub fn window(self) -> (u64, u64) {
        let per_page = self.per_page.clamp(1, Self::MAX_PER_PAGE);
        let page = self.page.max(1);
        ((page - 1) * per_page, per_page)
    }
}

/// A session as returned to callers, with its derived duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub slot_name: Option<String>,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub calendar_date: NaiveDate,
    pub is_open: bool,
    pub duration_seconds: i64,
    pub check_in_location: Option<GeoPoint>,
    pub check_out_location: Option<GeoPoint>,
    pub check_out_action: Option<String>,
    pub client_reported_at: Option<DateTime<Utc>>,
}

fn point(lat: Option<f64>, lng: Option<f64>) -> Option<GeoPoint> {
    Some(GeoPoint::new(lat?, lng?))
}

impl SessionView {
    pub fn new(session: Session, slot_name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            is_open: session.is_open(),
            duration_seconds: session.duration_at(now).num_seconds().max(0),
            check_in_location: point(session.check_in_lat, session.check_in_lng),
            check_out_location: point(session.check_out_lat, session.check_out_lng),
            id: session.id,
            user_id: session.user_id,
            slot_id: session.slot_id,
            slot_name,
            check_in_at: session.check_in_at,
            check_out_at: session.check_out_at,
            calendar_date: session.calendar_date,
            check_out_action: session.check_out_action,
            client_reported_at: session.client_reported_at,
        }
    }
}

#[derive(Clone)]
pub struct AttendanceService {
    db: DatabaseConnection,
    slots: Arc<dyn SlotRegistry>,
    publisher: Arc<dyn RosterPublisher>,
    policy: AttendancePolicy,
}

impl AttendanceService {
    pub fn new(
        db: DatabaseConnection,
        slots: Arc<dyn SlotRegistry>,
        publisher: Arc<dyn RosterPublisher>,
        policy: AttendancePolicy,
    ) -> Self {
        Self {
            db,
            slots,
            publisher,
            policy,
        }
    }

    /// Opens a session for the requester.
    ///
    /// The open-session lookup is only a fast path. The partial unique index decides
    /// when two check-ins for the same user race past it.
    pub async fn check_in(
        &self,
        requester: &Requester,
        req: CheckIn,
    ) -> Result<SessionView, AttendanceError> {
        let user_id = requester.user_id;
        let slot_id = req
            .slot_id
            .or(self.policy.default_slot_id)
            .ok_or(AttendanceError::InvalidSlot)?;

        let location = req.location.filter(GeoPoint::is_valid);
        if req.location.is_some() && location.is_none() {
            warn!(user_id, "ignoring out-of-range check-in coordinates");
        }

        if let Some(fence) = &self.policy.geofence {
            match location {
                Some(p) if fence.contains(p) => {}
                _ => {
                    info!(user_id, ?location, "check-in rejected outside geofence");
                    return Err(AttendanceError::OutsideGeofence);
                }
            }
        }

        self.ensure_account(user_id).await?;

        if !self
            .guarded(Session::open_for_user(&self.db, user_id))
            .await?
            .is_empty()
        {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        let Some(chosen) = self.guarded(self.slots.active_slot(slot_id)).await? else {
            debug!(user_id, slot_id, "check-in against unknown or inactive slot");
            return Err(AttendanceError::InvalidSlot);
        };

        let now = Utc::now();
        let insert = Session::insert_open(
            &self.db,
            NewSession {
                user_id,
                slot_id,
                check_in_at: now,
                location: location.map(|p| p.as_pair()),
                client_reported_at: req.client_timestamp,
            },
        );
        let session = match self.within(insert).await? {
            Ok(s) => s,
            Err(e) if is_unique_violation(&e) => {
                debug!(user_id, "concurrent check-in won the open-session index");
                return Err(AttendanceError::AlreadyCheckedIn);
            }
            Err(e) => return Err(e.into()),
        };

        info!(user_id, session_id = session.id, slot_id, "checked in");
        self.announce(RosterChangeKind::CheckedIn, &session);

        Ok(SessionView::new(session, Some(chosen.name), now))
    }

    /// Closes the requester's open session.
    ///
    /// If the store somehow holds several open sessions for the user, the most recently
    /// opened one is closed, the anomaly is recorded and the rest are left for repair.
    pub async fn check_out(
        &self,
        requester: &Requester,
        req: CheckOut,
    ) -> Result<SessionView, AttendanceError> {
        let user_id = requester.user_id;
        self.ensure_account(user_id).await?;

        let open = self
            .guarded(Session::open_for_user(&self.db, user_id))
            .await?;

        let Some(target) = open.first() else {
            return Err(AttendanceError::NotCheckedIn);
        };

        let now = Utc::now();
        let at = now.max(target.check_in_at + Duration::milliseconds(1));
        let location = req.location.filter(GeoPoint::is_valid);
        let details = CloseDetails {
            location: location.map(|p| p.as_pair()),
            action: req.client_action,
        };

        let Some(closed) = self
            .guarded(Session::close_if_open(&self.db, target.id, at, details))
            .await?
        else {
            debug!(user_id, session_id = target.id, "session closed concurrently");
            return Err(AttendanceError::NotCheckedIn);
        };

        if open.len() > 1 {
            self.record_anomaly(user_id, open.len(), closed.id).await;
        }

        info!(
            user_id,
            session_id = closed.id,
            action = closed.check_out_action.as_deref(),
            minutes = closed.duration_at(now).num_minutes(),
            "checked out"
        );
        self.announce(RosterChangeKind::CheckedOut, &closed);

        let slot_name = self
            .guarded(slot::Entity::find_by_id(closed.slot_id).one(&self.db))
            .await?
            .map(|s| s.name);
        Ok(SessionView::new(closed, slot_name, now))
    }

    /// Sessions of `user_id`, newest first.
    pub async fn history(
        &self,
        requester: &Requester,
        user_id: i64,
        page: Option<Page>,
    ) -> Result<Vec<SessionView>, AttendanceError> {
        if !requester.can_view(user_id) {
            return Err(AttendanceError::Forbidden);
        }

        let rows = self
            .guarded(Session::history_for_user(
                &self.db,
                user_id,
                page.map(Page::window),
            ))
            .await?;

        let now = Utc::now();
        Ok(rows
            .into_iter()
            .map(|(session, slot)| SessionView::new(session, slot.map(|s| s.name), now))
            .collect())
    }

    /// Everyone currently checked in, earliest arrival first. Admin only.
    pub async fn live_roster(
        &self,
        requester: &Requester,
    ) -> Result<Vec<RosterEntry>, AttendanceError> {
        if !requester.is_admin() {
            return Err(AttendanceError::Forbidden);
        }
        self.roster_snapshot().await
    }

    /// The open requester session, if any.
    pub async fn current(
        &self,
        requester: &Requester,
    ) -> Result<Option<SessionView>, AttendanceError> {
        let open = self
            .guarded(Session::open_for_user(&self.db, requester.user_id))
            .await?;
        let Some(session) = open.into_iter().next() else {
            return Ok(None);
        };
        let slot_name = self
            .guarded(slot::Entity::find_by_id(session.slot_id).one(&self.db))
            .await?
            .map(|s| s.name);
        Ok(Some(SessionView::new(session, slot_name, Utc::now())))
    }

    pub async fn roster_snapshot(&self) -> Result<Vec<RosterEntry>, AttendanceError> {
        load_roster(&self.db, self.policy.store_timeout).await
    }

    /// A verified token whose account has since been removed is not a member.
    async fn ensure_account(&self, user_id: i64) -> Result<(), AttendanceError> {
        match self
            .guarded(user::Entity::find_by_id(user_id).one(&self.db))
            .await?
        {
            Some(_) => Ok(()),
            None => {
                info!(user_id, "attendance request for a missing account");
                Err(AttendanceError::Unauthorized)
            }
        }
    }

    async fn record_anomaly(&self, user_id: i64, open_sessions: usize, resolved_session_id: i64) {
        error!(
            user_id,
            open_sessions,
            resolved_session_id,
            "multiple open attendance sessions; closed the most recent"
        );
        let recorded = self
            .guarded(attendance_anomaly::Model::record(
                &self.db,
                user_id,
                i32::try_from(open_sessions).unwrap_or(i32::MAX),
                resolved_session_id,
                Utc::now(),
            ))
            .await;
        if let Err(e) = recorded {
            error!(user_id, error = %e, "failed to record attendance anomaly");
        }
    }

    fn announce(&self, kind: RosterChangeKind, session: &Session) {
        self.publisher.publish(RosterDelta {
            kind,
            session_id: session.id,
            user_id: session.user_id,
        });
    }

    /// Bounds a store call by the policy timeout, leaving the store error untouched.
    async fn within<T, F>(&self, fut: F) -> Result<Result<T, DbErr>, AttendanceError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        tokio::time::timeout(self.policy.store_timeout, fut)
            .await
            .map_err(|_| {
                warn!(
                    timeout_ms = self.policy.store_timeout.as_millis() as u64,
                    "attendance store call timed out"
                );
                AttendanceError::StoreUnavailable
            })
    }

    async fn guarded<T, F>(&self, fut: F) -> Result<T, AttendanceError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        self.within(fut).await?.map_err(AttendanceError::from)
    }
}
