use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

/// A detected violation of the one-open-session-per-user rule and how it was resolved.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendance_anomalies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    /// Open sessions found at detection time.
    pub open_session_count: i32,
    /// The session that was closed to resolve it.
    pub resolved_session_id: i64,
    pub detected_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn record<C>(
        db: &C,
        user_id: i64,
        open_session_count: i32,
        resolved_session_id: i64,
        detected_at: DateTime<Utc>,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        ActiveModel {
            user_id: Set(user_id),
            open_session_count: Set(open_session_count),
            resolved_session_id: Set(resolved_session_id),
            detected_at: Set(detected_at),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn for_user<C>(db: &C, user_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::DetectedAt)
            .all(db)
            .await
    }
}
