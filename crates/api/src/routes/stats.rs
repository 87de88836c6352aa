//! Statistics and state read handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use reconciler::{AttendeeStats, EventStats};

use crate::response::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// No-show cutoff, typically the event's scheduled end time
    pub cutoff: Option<DateTime<Utc>>,
}

/// GET /events/{event_id}/stats - Event attendance roll-up.
pub async fn event_stats_handler(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<EventStats>, ApiError> {
    let stats = state.aggregator.event_stats(&event_id, query.cutoff).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateQuery {
    pub event_id: String,
}

/// GET /attendees/{badge_id}/state - Per-attendee attendance state.
///
/// 404 with `LOOKUP_001` when the badge resolves to nobody; a known
/// badge with no scans yet returns an empty state.
pub async fn attendee_state_handler(
    State(state): State<AppState>,
    Path(badge_id): Path<String>,
    Query(query): Query<StateQuery>,
) -> Result<Json<AttendeeStats>, ApiError> {
    state
        .directory
        .resolve(&badge_id, &query.event_id)
        .await?
        .ok_or_else(|| attendance_core::Error::badge_not_found(&badge_id))?;

    let stats = state
        .aggregator
        .attendee_stats(&badge_id, &query.event_id)
        .await?;
    Ok(Json(stats))
}
