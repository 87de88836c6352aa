//! Attendance state derived from the scan ledger.
//!
//! State is a left-fold over the ordered scan events for one
//! (badge, event) pair. The ledger is the source of truth; the state is
//! a cache that can always be rebuilt by replay. No hidden counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scan::{ScanEvent, ScanType};

/// Current check-in status for one attendee at one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    CheckedIn,
    CheckedOut,
    Unknown,
}

impl AttendanceStatus {
    /// Whether the attendee has any recorded attendance activity.
    pub fn has_attended(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Derived attendance projection for one (badge, event) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceState {
    pub badge_id: String,
    pub event_id: String,
    pub current_status: AttendanceStatus,
    /// Timestamp of the last accepted scan of any type
    pub last_scan_at: Option<DateTime<Utc>>,
    /// Start of the currently open session, if checked in
    pub open_session_started_at: Option<DateTime<Utc>>,
    /// Whole minutes accrued across closed sessions; never decreases
    pub cumulative_minutes: i64,
    /// Number of closed check-in/check-out sessions
    pub session_count: u32,
}

impl AttendanceState {
    /// State for a pair with no accepted scans.
    pub fn empty(badge_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            badge_id: badge_id.into(),
            event_id: event_id.into(),
            current_status: AttendanceStatus::Unknown,
            last_scan_at: None,
            open_session_started_at: None,
            cumulative_minutes: 0,
            session_count: 0,
        }
    }

    /// Folds one scan into the state.
    ///
    /// Total over all inputs so replay never fails: a check-in while a
    /// session is already open, or a check-out with none open, only
    /// advances `last_scan_at`. The validator prevents those sequences
    /// on the write path; raw-checkout imports produce the latter.
    pub fn apply(&mut self, scan: &ScanEvent) {
        self.last_scan_at = Some(scan.scanned_at);

        match scan.scan_type {
            ScanType::CheckIn => {
                if self.open_session_started_at.is_none() {
                    self.open_session_started_at = Some(scan.scanned_at);
                }
                self.current_status = AttendanceStatus::CheckedIn;
            }
            ScanType::CheckOut => {
                if let Some(opened) = self.open_session_started_at.take() {
                    let minutes = (scan.scanned_at - opened).num_minutes().max(0);
                    self.cumulative_minutes += minutes;
                    self.session_count += 1;
                }
                self.current_status = AttendanceStatus::CheckedOut;
            }
            ScanType::Verification => {}
        }
    }

    /// Rebuilds state by replaying an ordered event sequence.
    pub fn replay<'a, I>(
        badge_id: impl Into<String>,
        event_id: impl Into<String>,
        scans: I,
    ) -> Self
    where
        I: IntoIterator<Item = &'a ScanEvent>,
    {
        let mut state = Self::empty(badge_id, event_id);
        for scan in scans {
            state.apply(scan);
        }
        state
    }

    /// Whether a session is currently open.
    pub fn is_checked_in(&self) -> bool {
        self.current_status == AttendanceStatus::CheckedIn
    }

    /// Minutes in the open session as of `now`, if checked in.
    pub fn open_session_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.open_session_started_at
            .map(|opened| (now - opened).num_minutes().max(0))
    }
}
