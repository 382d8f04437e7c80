use chrono::{DateTime, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, QueryOrder, Set};
use serde::Serialize;

/// A named daily time window during which members may check in.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// e.g. "Morning Slot"
    pub name: String,
    /// "HH:MM"
    pub start_time: String,
    /// "HH:MM"
    pub end_time: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_session::Entity")]
    AttendanceSessions,
}

impl Related<super::attendance_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceSessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Parse an "HH:MM" wall-clock time.
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

impl Model {
    pub async fn create<C>(
        db: &C,
        name: &str,
        start_time: &str,
        end_time: &str,
        capacity: i32,
        is_active: bool,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        ActiveModel {
            name: Set(name.trim().to_owned()),
            start_time: Set(start_time.trim().to_owned()),
            end_time: Set(end_time.trim().to_owned()),
            capacity: Set(capacity),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn list<C>(db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Whether `t` falls inside this slot's window. Windows that wrap past
    /// midnight (start > end) are honoured. Unparseable bounds never match.
    pub fn contains_time(&self, t: NaiveTime) -> bool {
        let (Some(start), Some(end)) = (parse_hhmm(&self.start_time), parse_hhmm(&self.end_time))
        else {
            return false;
        };
        if start <= end {
            start <= t && t < end
        } else {
            t >= start || t < end
        }
    }
}
