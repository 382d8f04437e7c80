use db::models::slot::Model as Slot;
use serde::{Deserialize, Serialize};
use services::slot_service::{CreateSlot, UpdateSlot};
use validator::Validate;

#[derive(Debug, Serialize, Default)]
pub struct SlotResponse {
    pub id: i64,
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub capacity: i32,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Slot> for SlotResponse {
    fn from(s: Slot) -> Self {
        Self {
            id: s.id,
            name: s.name,
            start_time: s.start_time,
            end_time: s.end_time,
            capacity: s.capacity,
            is_active: s.is_active,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSlotRequest {
    #[validate(length(min = 1, max = 100, message = "Slot name is required"))]
    pub name: String,
    #[validate(length(equal = 5, message = "start_time must be HH:MM"))]
    pub start_time: String,
    #[validate(length(equal = 5, message = "end_time must be HH:MM"))]
    pub end_time: String,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
    pub is_active: Option<bool>,
}

impl From<CreateSlotRequest> for CreateSlot {
    fn from(r: CreateSlotRequest) -> Self {
        CreateSlot {
            name: r.name,
            start_time: r.start_time,
            end_time: r.end_time,
            capacity: r.capacity,
            is_active: r.is_active,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSlotRequest {
    #[validate(length(min = 1, max = 100, message = "Slot name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(equal = 5, message = "start_time must be HH:MM"))]
    pub start_time: Option<String>,
    #[validate(length(equal = 5, message = "end_time must be HH:MM"))]
    pub end_time: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub is_active: Option<bool>,
}

impl From<UpdateSlotRequest> for UpdateSlot {
    fn from(r: UpdateSlotRequest) -> Self {
        UpdateSlot {
            name: r.name,
            start_time: r.start_time,
            end_time: r.end_time,
            capacity: r.capacity,
            is_active: r.is_active,
        }
    }
}
