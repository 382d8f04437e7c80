use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::slot_service::SlotService;

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use crate::routes::common::slot_failure;
use crate::state::AppState;

/// DELETE /api/slots/{slot_id}
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
/// - `409 Conflict` `slot_in_use` when sessions reference the slot
pub async fn delete_slot(
    State(state): State<AppState>,
    Path(slot_id): Path<i64>,
) -> impl IntoResponse {
    match SlotService::delete(state.db(), slot_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<Empty>::success(Empty, "Slot deleted")),
        ),
        Err(e) => slot_failure(e),
    }
}
