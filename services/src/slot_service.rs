use async_trait::async_trait;
use chrono::Utc;
use db::models::{
    attendance_session,
    slot::{self, ActiveModel, Entity as SlotEntity, Model as Slot, parse_hhmm},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, Set};
use serde::Deserialize;

use crate::error::SlotError;

/// Answers "may a session be opened against this slot right now".
#[async_trait]
pub trait SlotRegistry: Send + Sync {
    /// The slot, if it exists and is active.
    async fn active_slot(&self, slot_id: i64) -> Result<Option<Slot>, DbErr>;

    /// Unknown slots are reported inactive.
    async fn is_active(&self, slot_id: i64) -> Result<bool, DbErr> {
        Ok(self.active_slot(slot_id).await?.is_some())
    }
}

/// Slot registry backed by the `slots` table.
#[derive(Clone)]
pub struct DbSlotRegistry {
    db: DatabaseConnection,
}

impl DbSlotRegistry {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SlotRegistry for DbSlotRegistry {
    async fn active_slot(&self, slot_id: i64) -> Result<Option<Slot>, DbErr> {
        Ok(SlotEntity::find_by_id(slot_id)
            .one(&self.db)
            .await?
            .filter(|s| s.is_active))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlot {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlot {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

fn check_name(name: &str) -> Result<(), SlotError> {
    if name.trim().is_empty() {
        return Err(SlotError::Invalid("Slot name must not be empty".into()));
    }
    Ok(())
}

fn check_time(field: &str, value: &str) -> Result<(), SlotError> {
    parse_hhmm(value)
        .map(|_| ())
        .ok_or_else(|| SlotError::Invalid(format!("{field} must be HH:MM")))
}

fn check_capacity(capacity: i32) -> Result<(), SlotError> {
    if capacity < 1 {
        return Err(SlotError::Invalid("Capacity must be at least 1".into()));
    }
    Ok(())
}

/// Admin-facing slot management.
pub struct SlotService;

impl SlotService {
    pub async fn list(db: &DatabaseConnection) -> Result<Vec<Slot>, SlotError> {
        Ok(Slot::list(db).await?)
    }

    pub async fn get(db: &DatabaseConnection, slot_id: i64) -> Result<Slot, SlotError> {
        SlotEntity::find_by_id(slot_id)
            .one(db)
            .await?
            .ok_or(SlotError::NotFound)
    }

    pub async fn create(db: &DatabaseConnection, params: CreateSlot) -> Result<Slot, SlotError> {
        check_name(&params.name)?;
        check_time("start_time", &params.start_time)?;
        check_time("end_time", &params.end_time)?;
        check_capacity(params.capacity)?;

        let slot = Slot::create(
            db,
            &params.name,
            &params.start_time,
            &params.end_time,
            params.capacity,
            params.is_active.unwrap_or(true),
        )
        .await?;
        tracing::info!(slot_id = slot.id, name = %slot.name, "slot created");
        Ok(slot)
    }

    pub async fn update(
        db: &DatabaseConnection,
        slot_id: i64,
        params: UpdateSlot,
    ) -> Result<Slot, SlotError> {
        let existing = Self::get(db, slot_id).await?;
        let mut active: ActiveModel = existing.into_active_model();

        if let Some(name) = params.name {
            check_name(&name)?;
            active.name = Set(name.trim().to_owned());
        }
        if let Some(start) = params.start_time {
            check_time("start_time", &start)?;
            active.start_time = Set(start.trim().to_owned());
        }
        if let Some(end) = params.end_time {
            check_time("end_time", &end)?;
            active.end_time = Set(end.trim().to_owned());
        }
        if let Some(capacity) = params.capacity {
            check_capacity(capacity)?;
            active.capacity = Set(capacity);
        }
        if let Some(is_active) = params.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(Utc::now());

        let slot = active.update(db).await?;
        tracing::info!(slot_id = slot.id, is_active = slot.is_active, "slot updated");
        Ok(slot)
    }

    /// Slots that sessions point at are kept; deactivate those instead.
    pub async fn delete(db: &DatabaseConnection, slot_id: i64) -> Result<(), SlotError> {
        Self::get(db, slot_id).await?;
        if attendance_session::Model::count_for_slot(db, slot_id).await? > 0 {
            return Err(SlotError::InUse);
        }
        slot::Entity::delete_by_id(slot_id).exec(db).await?;
        tracing::info!(slot_id, "slot deleted");
        Ok(())
    }
}
