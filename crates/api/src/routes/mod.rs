//! API routes.

pub mod health;
pub mod scans;
pub mod sessions;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Creates the API router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/scans", post(scans::scan_handler))
        .route("/sessions/start", post(sessions::start_handler))
        .route("/sessions/:id/end", post(sessions::end_handler))
        .route("/sessions/:id", get(sessions::get_handler))
        .route("/events/:event_id/stats", get(stats::event_stats_handler))
        .route("/events/:event_id/scans", get(scans::recent_handler))
        .route(
            "/attendees/:badge_id/state",
            get(stats::attendee_state_handler),
        )
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
