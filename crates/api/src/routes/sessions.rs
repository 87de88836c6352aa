//! Scan session endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use attendance_core::ScanSession;

use crate::extractors::Operator;
use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 64))]
    pub event_id: String,
}

/// POST /sessions/start - Start a tracking session for an event.
///
/// 409 with `SESSION_001` when the event already has an active session.
pub async fn start_handler(
    State(state): State<AppState>,
    Operator(operator): Operator,
    Json(request): Json<StartSessionRequest>,
) -> Result<(StatusCode, Json<ScanSession>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let session = state
        .sessions
        .start_session(&request.event_id, operator)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// POST /sessions/{id}/end - End a session. Idempotent.
pub async fn end_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScanSession>, ApiError> {
    let session = state.sessions.end_session(id).await?;
    Ok(Json(session))
}

/// GET /sessions/{id} - Session by id.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScanSession>, ApiError> {
    let session = state
        .sessions
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("SESSION_002", format!("session {id} does not exist")))?;
    Ok(Json(session))
}
