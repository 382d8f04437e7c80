use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::slot_service::SlotService;
use validator::Validate;

use super::common::{SlotResponse, UpdateSlotRequest};
use crate::response::ApiResponse;
use crate::routes::common::{slot_failure, validation_failed};
use crate::state::AppState;

/// PUT /api/slots/{slot_id}
///
/// Partial update; absent fields keep their value. Set `is_active: false` to stop
/// new check-ins without touching existing sessions.
pub async fn update_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
    Json(req): Json<UpdateSlotRequest>,
) -> impl IntoResponse {
    if let Err(errors) = req.validate() {
        return validation_failed::<SlotResponse>(&errors);
    }

    match SlotService::update(state.db(), slot_id, req.into()).await {
        Ok(slot) => (
            StatusCode::OK,
            Json(ApiResponse::success(SlotResponse::from(slot), "Slot updated")),
        ),
        Err(e) => slot_failure(e),
    }
}
