//! Scan session persistence.
//!
//! The store enforces the single-active-session-per-event invariant:
//! `start` is a check-and-insert on the per-event active record, done
//! under one lock so two concurrent starts cannot both succeed.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

use attendance_core::{Error, Result, ScanSession, SessionErrorCode};

/// Persistence for scan tracking sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session. Fails with `SESSION_001` if the event
    /// already has an active session.
    async fn start(&self, session: ScanSession) -> Result<ScanSession>;

    /// Session by id.
    async fn get(&self, id: Uuid) -> Result<Option<ScanSession>>;

    /// The active session for an event, if any.
    async fn active_for_event(&self, event_id: &str) -> Result<Option<ScanSession>>;

    /// Persists updated counters or an end timestamp. Clears the
    /// event's active slot when the session has ended.
    async fn update(&self, session: ScanSession) -> Result<()>;
}

#[derive(Default)]
struct SessionMaps {
    /// All sessions ever stored, by id
    by_id: HashMap<Uuid, ScanSession>,
    /// Active session id per event
    active: HashMap<String, Uuid>,
}

/// In-memory session store.
#[derive(Default)]
pub struct MemorySessionStore {
    // Single lock over both maps keeps start/update atomic with the
    // active-slot bookkeeping.
    inner: Mutex<SessionMaps>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn start(&self, session: ScanSession) -> Result<ScanSession> {
        let mut inner = self.inner.lock();

        if let Some(existing_id) = inner.active.get(&session.event_id) {
            let existing_id = *existing_id;
            // A stale slot (ended session never cleared) does not block.
            let still_active = inner
                .by_id
                .get(&existing_id)
                .is_some_and(|s| s.is_active());
            if still_active {
                return Err(Error::session(
                    SessionErrorCode::AlreadyActive,
                    format!(
                        "event '{}' already has active session {}",
                        session.event_id, existing_id
                    ),
                ));
            }
            inner.active.remove(&session.event_id);
        }

        inner.active.insert(session.event_id.clone(), session.id);
        inner.by_id.insert(session.id, session.clone());
        Ok(session)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ScanSession>> {
        Ok(self.inner.lock().by_id.get(&id).cloned())
    }

    async fn active_for_event(&self, event_id: &str) -> Result<Option<ScanSession>> {
        let inner = self.inner.lock();
        Ok(inner
            .active
            .get(event_id)
            .and_then(|id| inner.by_id.get(id))
            .filter(|s| s.is_active())
            .cloned())
    }

    async fn update(&self, session: ScanSession) -> Result<()> {
        let mut inner = self.inner.lock();

        if !session.is_active() {
            if inner.active.get(&session.event_id) == Some(&session.id) {
                inner.active.remove(&session.event_id);
            }
        }
        inner.by_id.insert(session.id, session);
        Ok(())
    }
}

/// Convenience for tests: end a session through the store.
pub async fn end_session(store: &dyn SessionStore, id: Uuid) -> Result<Option<ScanSession>> {
    match store.get(id).await? {
        Some(mut session) => {
            session.end(Utc::now());
            store.update(session.clone()).await?;
            Ok(Some(session))
        }
        None => Ok(None),
    }
}
