//! Scan endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use attendance_core::limits::{DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
use attendance_core::{ScanEvent, ScanRequest};
use reconciler::ScanOutcome;

use crate::extractors::Operator;
use crate::response::ApiError;
use crate::state::AppState;

/// POST /scans - Process one badge scan.
///
/// Business-rule rejections come back as 200 with `accepted: false` and
/// a reason code; the scanning station shows them to the operator rather
/// than retrying. Errors (unknown badge, store faults) use error status
/// codes.
pub async fn scan_handler(
    State(state): State<AppState>,
    Operator(operator): Operator,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ScanOutcome>, ApiError> {
    let outcome = state.processor.process(request, operator).await?;
    Ok(Json(outcome))
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentScansResponse {
    pub event_id: String,
    pub scans: Vec<ScanEvent>,
}

/// GET /events/{event_id}/scans - Recent scans for an event, newest first.
pub async fn recent_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<RecentScansResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let scans = state.ledger.recent_for_event(&event_id, limit).await?;
    debug!(event_id = %event_id, count = scans.len(), "Fetched recent scans");

    Ok(Json(RecentScansResponse { event_id, scans }))
}
