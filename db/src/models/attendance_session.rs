use chrono::{DateTime, Duration, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, FromQueryResult, JoinType, QueryOrder, QuerySelect, Set,
};
use serde::Serialize;

use super::{slot, user};

/// One check-in → check-out interval for one user.
///
/// A row with `check_out_at = NULL` is an *open* session. The partial unique index
/// created by the migration allows at most one open row per `user_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub slot_id: i64,
    pub check_in_at: DateTime<Utc>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub calendar_date: NaiveDate,
    pub check_in_lat: Option<f64>,
    pub check_in_lng: Option<f64>,
    pub check_out_lat: Option<f64>,
    pub check_out_lng: Option<f64>,
    /// How the client says it checked out, e.g. "qr" or "manual".
    pub check_out_action: Option<String>,
    /// What the client claimed the time was. Never used for ordering or durations.
    pub client_reported_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::slot::Entity",
        from = "Column::SlotId",
        to = "super::slot::Column::Id"
    )]
    Slot,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Slot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Where and how a session was closed.
#[derive(Debug, Clone, Default)]
pub struct CloseDetails {
    pub location: Option<(f64, f64)>,
    pub action: Option<String>,
}

/// Fields for a freshly opened session.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub user_id: i64,
    pub slot_id: i64,
    pub check_in_at: DateTime<Utc>,
    pub location: Option<(f64, f64)>,
    pub client_reported_at: Option<DateTime<Utc>>,
}

/// Open session joined with the user and slot display fields.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct OpenSessionRow {
    pub session_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub slot_id: i64,
    pub slot_name: String,
    pub check_in_at: DateTime<Utc>,
}

impl Model {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.check_out_at.is_none()
    }

    /// Closed: `check_out_at - check_in_at`. Open: `now - check_in_at`.
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        self.check_out_at.unwrap_or(now) - self.check_in_at
    }

    /// Insert an open session. `calendar_date` is the UTC date of `check_in_at`.
    ///
    /// Fails with a unique-constraint violation if the user already has an open session.
    pub async fn insert_open<C>(db: &C, new: NewSession) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            user_id: Set(new.user_id),
            slot_id: Set(new.slot_id),
            check_in_at: Set(new.check_in_at),
            check_out_at: Set(None),
            calendar_date: Set(new.check_in_at.date_naive()),
            check_in_lat: Set(new.location.map(|(lat, _)| lat)),
            check_in_lng: Set(new.location.map(|(_, lng)| lng)),
            check_out_lat: Set(None),
            check_out_lng: Set(None),
            check_out_action: Set(None),
            client_reported_at: Set(new.client_reported_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Open sessions for `user_id`, most recently opened first.
    pub async fn open_for_user<C>(db: &C, user_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::CheckOutAt.is_null())
            .order_by_desc(Column::CheckInAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    /// Set `check_out_at` on session `id` only if it is still open.
    ///
    /// Returns `None` when another writer closed it first.
    pub async fn close_if_open<C>(
        db: &C,
        id: i64,
        at: DateTime<Utc>,
        details: CloseDetails,
    ) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let CloseDetails { location, action } = details;
        let res = Entity::update_many()
            .col_expr(Column::CheckOutAt, Expr::value(Some(at)))
            .col_expr(Column::CheckOutLat, Expr::value(location.map(|(lat, _)| lat)))
            .col_expr(Column::CheckOutLng, Expr::value(location.map(|(_, lng)| lng)))
            .col_expr(Column::CheckOutAction, Expr::value(action))
            .filter(Column::Id.eq(id))
            .filter(Column::CheckOutAt.is_null())
            .exec(db)
            .await?;

        if res.rows_affected == 0 {
            return Ok(None);
        }
        Entity::find_by_id(id).one(db).await
    }

    /// All sessions for `user_id`, newest first, each with its slot.
    ///
    /// `window` is an optional `(offset, limit)`.
    pub async fn history_for_user<C>(
        db: &C,
        user_id: i64,
        window: Option<(u64, u64)>,
    ) -> Result<Vec<(Model, Option<slot::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::CheckInAt)
            .order_by_desc(Column::Id)
            .find_also_related(slot::Entity);

        if let Some((offset, limit)) = window {
            query = query.offset(offset).limit(limit);
        }
        query.all(db).await
    }

    /// Every open session with display fields, oldest check-in first.
    pub async fn open_roster<C>(db: &C) -> Result<Vec<OpenSessionRow>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .select_only()
            .column_as(Column::Id, "session_id")
            .column_as(Column::UserId, "user_id")
            .column_as(user::Column::Name, "user_name")
            .column_as(user::Column::Email, "user_email")
            .column_as(Column::SlotId, "slot_id")
            .column_as(slot::Column::Name, "slot_name")
            .column_as(Column::CheckInAt, "check_in_at")
            .join(JoinType::InnerJoin, Relation::User.def())
            .join(JoinType::InnerJoin, Relation::Slot.def())
            .filter(Column::CheckOutAt.is_null())
            .order_by_asc(Column::CheckInAt)
            .order_by_asc(Column::Id)
            .into_model::<OpenSessionRow>()
            .all(db)
            .await
    }

    /// Number of sessions (open or closed) attributed to `slot_id`.
    pub async fn count_for_slot<C>(db: &C, slot_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SlotId.eq(slot_id))
            .count(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    async fn seed(db: &sea_orm::DatabaseConnection) -> (user::Model, slot::Model) {
        let u = user::Model::create(db, "Reader", "reader@test.com", "password", false)
            .await
            .unwrap();
        let s = slot::Model::create(db, "Afternoon", "13:00", "17:00", 30, true)
            .await
            .unwrap();
        (u, s)
    }

    fn new_session(user_id: i64, slot_id: i64, at: DateTime<Utc>) -> NewSession {
        NewSession {
            user_id,
            slot_id,
            check_in_at: at,
            location: Some((28.6129, 77.2295)),
            client_reported_at: None,
        }
    }

    #[tokio::test]
    async fn second_open_session_for_same_user_violates_index() {
        let db = setup_test_db().await;
        let (u, s) = seed(&db).await;

        let first = Model::insert_open(&db, new_session(u.id, s.id, Utc::now()))
            .await
            .unwrap();
        assert!(first.is_open());
        assert_eq!(first.calendar_date, first.check_in_at.date_naive());
        assert_eq!(first.check_in_lat, Some(28.6129));

        let err = Model::insert_open(&db, new_session(u.id, s.id, Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(
            err.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ));
    }

    #[tokio::test]
    async fn close_if_open_only_succeeds_once() {
        let db = setup_test_db().await;
        let (u, s) = seed(&db).await;
        let t0 = Utc::now() - Duration::minutes(30);
        let open = Model::insert_open(&db, new_session(u.id, s.id, t0))
            .await
            .unwrap();

        let t1 = Utc::now();
        let details = CloseDetails {
            location: None,
            action: Some("qr".into()),
        };
        let closed = Model::close_if_open(&db, open.id, t1, details)
            .await
            .unwrap()
            .expect("first close wins");
        assert!(!closed.is_open());
        assert_eq!(closed.check_out_action.as_deref(), Some("qr"));
        assert!(closed.duration_at(Utc::now()) >= Duration::minutes(29));

        let again = Model::close_if_open(&db, open.id, Utc::now(), CloseDetails::default())
            .await
            .unwrap();
        assert!(again.is_none());

        // a new open session is allowed once the previous one is closed
        Model::insert_open(&db, new_session(u.id, s.id, Utc::now()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn open_roster_joins_user_and_slot_names() {
        let db = setup_test_db().await;
        let (u, s) = seed(&db).await;
        Model::insert_open(&db, new_session(u.id, s.id, Utc::now()))
            .await
            .unwrap();

        let rows = Model::open_roster(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_name, "Reader");
        assert_eq!(rows[0].user_email, "reader@test.com");
        assert_eq!(rows[0].slot_name, "Afternoon");
        assert_eq!(Model::count_for_slot(&db, s.id).await.unwrap(), 1);
    }
}
