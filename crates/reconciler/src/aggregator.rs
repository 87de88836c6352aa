//! Event-level attendance aggregation.
//!
//! Every figure here is derived by replaying the ledger against the
//! registered roster at query time. Nothing is cached, so the numbers
//! can lag a busy check-in desk by the cost of a replay but can never
//! drift from the ledger.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use attendance_core::{AttendanceState, AttendanceStatus, PairKey, Result};
use attendance_store::{AttendeeDirectory, ScanLedger};

/// Roll-up of one event's attendance.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    pub event_id: String,
    /// Size of the registered roster
    pub registered: u64,
    /// Roster members who checked in at least once
    pub attended: u64,
    /// Currently checked in
    pub checked_in: u64,
    /// Checked in at some point, currently out
    pub checked_out: u64,
    /// Roster members with no scans, past the no-show cutoff
    pub no_show: u64,
    /// Roster members with no scans, cutoff not yet reached (or no cutoff)
    pub pending: u64,
    /// Head count currently inside the venue
    pub in_venue: u64,
    /// Minutes accrued across all closed sessions for the event
    pub total_minutes: i64,
    /// attended / registered as a whole percentage; 0 for an empty roster
    pub attendance_rate: u32,
}

/// Per-attendee attendance figures for one event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeStats {
    pub badge_id: String,
    pub event_id: String,
    pub status: AttendanceStatus,
    pub last_scan_at: Option<DateTime<Utc>>,
    pub total_minutes: i64,
    pub session_count: u32,
    /// Minutes in the currently open session, when checked in
    pub open_session_minutes: Option<i64>,
}

impl AttendeeStats {
    fn from_state(state: AttendanceState, now: DateTime<Utc>) -> Self {
        Self {
            open_session_minutes: state.open_session_minutes(now),
            badge_id: state.badge_id,
            event_id: state.event_id,
            status: state.current_status,
            last_scan_at: state.last_scan_at,
            total_minutes: state.cumulative_minutes,
            session_count: state.session_count,
        }
    }
}

/// Derives event and attendee statistics from the roster and the ledger.
pub struct Aggregator {
    directory: Arc<dyn AttendeeDirectory>,
    ledger: Arc<dyn ScanLedger>,
}

impl Aggregator {
    pub fn new(directory: Arc<dyn AttendeeDirectory>, ledger: Arc<dyn ScanLedger>) -> Self {
        Self { directory, ledger }
    }

    /// Computes the event roll-up.
    ///
    /// `cutoff` is the advisory no-show threshold (typically the event's
    /// end time): roster members with no scans count as no-shows once
    /// `now` passes it, and as pending before.
    pub async fn event_stats(
        &self,
        event_id: &str,
        cutoff: Option<DateTime<Utc>>,
    ) -> Result<EventStats> {
        let roster = self.directory.registered_for_event(event_id).await?;
        let now = Utc::now();
        let past_cutoff = cutoff.is_some_and(|c| now >= c);

        let mut stats = EventStats {
            event_id: event_id.to_string(),
            registered: roster.len() as u64,
            attended: 0,
            checked_in: 0,
            checked_out: 0,
            no_show: 0,
            pending: 0,
            in_venue: 0,
            total_minutes: 0,
            attendance_rate: 0,
        };

        for attendee in &roster {
            let key = PairKey::new(attendee.badge_id.clone(), event_id);
            let history = self.ledger.events_for_pair(&key).await?;
            let state = AttendanceState::replay(&key.badge_id, event_id, &history);
            stats.total_minutes += state.cumulative_minutes;

            match state.current_status {
                AttendanceStatus::CheckedIn => {
                    stats.attended += 1;
                    stats.checked_in += 1;
                    stats.in_venue += 1;
                }
                AttendanceStatus::CheckedOut => {
                    stats.attended += 1;
                    stats.checked_out += 1;
                }
                AttendanceStatus::Unknown if past_cutoff => stats.no_show += 1,
                AttendanceStatus::Unknown => stats.pending += 1,
            }
        }

        if stats.registered > 0 {
            stats.attendance_rate =
                ((stats.attended as f64 / stats.registered as f64) * 100.0).round() as u32;
        }

        debug!(
            event_id = %event_id,
            registered = stats.registered,
            attended = stats.attended,
            rate = stats.attendance_rate,
            "Computed event stats"
        );
        Ok(stats)
    }

    /// Per-attendee figures, replayed from the ledger.
    pub async fn attendee_stats(&self, badge_id: &str, event_id: &str) -> Result<AttendeeStats> {
        let key = PairKey::new(badge_id, event_id);
        let history = self.ledger.events_for_pair(&key).await?;
        let state = AttendanceState::replay(badge_id, event_id, &history);
        Ok(AttendeeStats::from_state(state, Utc::now()))
    }
}
