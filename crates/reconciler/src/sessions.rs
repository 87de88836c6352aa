//! Scan session control.
//!
//! Start/stop of an organizer's live tracking window, plus attribution
//! of accepted scans to the active session. The session store enforces
//! the single-active-session invariant; this controller adds the
//! per-session seen-badge bookkeeping for unique/duplicate counts.

use chrono::Utc;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use attendance_core::{Error, Result, ScanSession, SessionErrorCode};
use attendance_store::SessionStore;
use telemetry::metrics;

/// Coordinates live tracking sessions for events.
pub struct SessionController {
    store: Arc<dyn SessionStore>,
    /// Badges seen per active session, for unique-attendee counting
    seen: Mutex<HashMap<Uuid, HashSet<String>>>,
}

impl SessionController {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Starts a tracking session for an event.
    ///
    /// Fails with `SESSION_001` when the event already has one; the
    /// operator can join the existing session instead.
    pub async fn start_session(
        &self,
        event_id: &str,
        started_by: Option<String>,
    ) -> Result<ScanSession> {
        let session = self
            .store
            .start(ScanSession::new(event_id, started_by))
            .await?;

        self.seen.lock().insert(session.id, HashSet::new());
        metrics().sessions_started.inc();
        metrics().active_sessions.inc();

        info!(
            session_id = %session.id,
            event_id = %event_id,
            "Scan session started"
        );
        Ok(session)
    }

    /// Ends a session and persists the final counter snapshot.
    ///
    /// Idempotent: ending an already-ended session returns it unchanged
    /// rather than erroring, because operator UIs double-click "end".
    pub async fn end_session(&self, session_id: Uuid) -> Result<ScanSession> {
        let mut session = self
            .store
            .get(session_id)
            .await?
            .ok_or_else(|| {
                Error::session(
                    SessionErrorCode::NotFound,
                    format!("session {session_id} does not exist"),
                )
            })?;

        if !session.is_active() {
            debug!(session_id = %session_id, "Session already ended");
            return Ok(session);
        }

        session.end(Utc::now());
        self.store.update(session.clone()).await?;
        self.seen.lock().remove(&session_id);
        metrics().sessions_ended.inc();
        metrics().active_sessions.dec();

        info!(
            session_id = %session_id,
            event_id = %session.event_id,
            total_scans = session.total_scans,
            unique_attendees = session.unique_attendees,
            "Scan session ended"
        );
        Ok(session)
    }

    /// Session by id.
    pub async fn get(&self, session_id: Uuid) -> Result<Option<ScanSession>> {
        self.store.get(session_id).await
    }

    /// The active session for an event, if any.
    pub async fn active_for_event(&self, event_id: &str) -> Result<Option<ScanSession>> {
        self.store.active_for_event(event_id).await
    }

    /// Attributes one accepted scan to the event's active session.
    ///
    /// Returns the session id when one was active, None otherwise.
    /// A scan outside any session is still valid, just unattributed.
    pub async fn record_scan(&self, event_id: &str, badge_id: &str) -> Result<Option<Uuid>> {
        let Some(mut session) = self.store.active_for_event(event_id).await? else {
            return Ok(None);
        };

        let first_time = self
            .seen
            .lock()
            .entry(session.id)
            .or_default()
            .insert(badge_id.to_string());

        session.record_scan(first_time);
        let id = session.id;
        self.store.update(session).await?;
        Ok(Some(id))
    }
}
