use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use services::roster::RosterEntry;

use super::common::SessionResponse;
use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{PageQuery, attendance_failure};
use crate::state::AppState;

async fn history_for(
    state: &AppState,
    user: &AuthUser,
    user_id: i64,
    query: PageQuery,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    match state
        .attendance()
        .history(&user.requester(), user_id, query.into_page())
        .await
    {
        Ok(sessions) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                sessions.into_iter().map(SessionResponse::from).collect(),
                "Attendance history retrieved",
            )),
        ),
        Err(e) => attendance_failure(e),
    }
}

/// GET /api/attendance/history?page=&per_page=
///
/// The caller's own sessions, newest first. Without paging parameters every session
/// is returned; `per_page` is clamped to 1..=100.
pub async fn my_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    let user_id = user.0.sub;
    history_for(&state, &user, user_id, query).await
}

/// GET /api/attendance/history/{user_id}
///
/// Members may only read their own history (`403 forbidden` otherwise); admins any.
pub async fn user_history(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(user_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> impl IntoResponse {
    history_for(&state, &user, user_id, query).await
}

/// GET /api/attendance/current
///
/// The caller's open session, or `null` when checked out.
pub async fn current(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
    match state.attendance().current(&user.requester()).await {
        Ok(session) => {
            let message = if session.is_some() {
                "Currently checked in"
            } else {
                "Not checked in"
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    session.map(SessionResponse::from),
                    message,
                )),
            )
        }
        Err(e) => attendance_failure(e),
    }
}

/// GET /api/attendance/live
///
/// Everyone currently checked in, earliest arrival first. Admin only.
pub async fn live(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> impl IntoResponse {
    match state.attendance().live_roster(&user.requester()).await {
        Ok(roster) => {
            let message = format!("{} currently checked in", roster.len());
            (
                StatusCode::OK,
                Json(ApiResponse::<Vec<RosterEntry>>::success(roster, message)),
            )
        }
        Err(e) => attendance_failure(e),
    }
}
