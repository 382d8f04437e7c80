use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use services::slot_service::SlotService;
use validator::Validate;

use super::common::{CreateSlotRequest, SlotResponse};
use crate::response::ApiResponse;
use crate::routes::common::{slot_failure, validation_failed};
use crate::state::AppState;

/// POST /api/slots
///
/// ### Request Body
/// ```json
/// { "name": "Morning", "start_time": "09:00", "end_time": "13:00", "capacity": 50, "is_active": true }
/// ```
///
/// ### Responses
/// - `201 Created` with the slot
/// - `400 Bad Request` for empty names, malformed times or capacity below 1
pub async fn create_slot(
    State(state): State<AppState>,
    Json(req): Json<CreateSlotRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return validation_failed::<SlotResponse>(&errors);
    }

    match SlotService::create(state.db(), req.into()).await {
        Ok(slot) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(SlotResponse::from(slot), "Slot created")),
        ),
        Err(e) => slot_failure(e),
    }
}
