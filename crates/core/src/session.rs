//! Scan tracking session records.
//!
//! A tracking session is an organizer's bounded monitoring window for
//! one event. Scans recorded while it is active are attributed to it
//! for live analytics; the scan ledger itself is independent of session
//! lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live tracking session for one event.
///
/// At most one session may be active per event at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSession {
    /// Unique session id
    pub id: Uuid,
    /// Event being tracked
    pub event_id: String,
    /// Operator who started the session
    pub started_by: Option<String>,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Session end time; None while active
    pub ended_at: Option<DateTime<Utc>>,
    /// Accepted scans attributed to this session
    pub total_scans: u64,
    /// Distinct badges seen in this session
    pub unique_attendees: u64,
    /// Scans for badges already seen in this session
    pub duplicate_scans: u64,
}

impl ScanSession {
    /// Creates a new active session.
    pub fn new(event_id: impl Into<String>, started_by: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id: event_id.into(),
            started_by,
            started_at: Utc::now(),
            ended_at: None,
            total_scans: 0,
            unique_attendees: 0,
            duplicate_scans: 0,
        }
    }

    /// Whether the session is still active.
    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Attributes one accepted scan to this session.
    pub fn record_scan(&mut self, first_time_attendee: bool) {
        self.total_scans += 1;
        if first_time_attendee {
            self.unique_attendees += 1;
        } else {
            self.duplicate_scans += 1;
        }
    }

    /// Closes the session. Safe to call on an already-ended session.
    pub fn end(&mut self, now: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }

    /// Wall-clock length of the session so far, in seconds.
    pub fn duration_secs(&self, now: DateTime<Utc>) -> i64 {
        let end = self.ended_at.unwrap_or(now);
        (end - self.started_at).num_seconds().max(0)
    }
}
