use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::slot_service::SlotService;

use super::common::SlotResponse;
use crate::response::ApiResponse;
use crate::routes::common::slot_failure;
use crate::state::AppState;

/// GET /api/slots
///
/// All slots ordered by start time, inactive ones included.
pub async fn list_slots(State(state): State<AppState>) -> impl IntoResponse {
    match SlotService::list(state.db()).await {
        Ok(slots) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                slots
                    .into_iter()
                    .map(SlotResponse::from)
                    .collect::<Vec<_>>(),
                "Slots retrieved",
            )),
        ),
        Err(e) => slot_failure(e),
    }
}

/// GET /api/slots/{slot_id}
pub async fn get_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> impl IntoResponse {
    match SlotService::get(state.db(), slot_id).await {
        Ok(slot) => (
            StatusCode::OK,
            Json(ApiResponse::success(SlotResponse::from(slot), "Slot retrieved")),
        ),
        Err(e) => slot_failure(e),
    }
}
