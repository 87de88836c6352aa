//! Scan event definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The kind of a badge scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    CheckIn,
    CheckOut,
    Verification,
}

impl ScanType {
    /// Returns the scan type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
            Self::Verification => "verification",
        }
    }

    /// Whether this scan type can change the attendee's current status.
    ///
    /// Verification scans confirm identity only.
    pub fn affects_status(&self) -> bool {
        !matches!(self, Self::Verification)
    }
}

/// Key identifying one attendee at one event.
///
/// All ordering and locking is scoped to this pair: scans for the same
/// pair are serialized, scans across pairs proceed in parallel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub badge_id: String,
    pub event_id: String,
}

impl PairKey {
    pub fn new(badge_id: impl Into<String>, event_id: impl Into<String>) -> Self {
        Self {
            badge_id: badge_id.into(),
            event_id: event_id.into(),
        }
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.badge_id, self.event_id)
    }
}

/// An immutable, accepted badge scan.
///
/// Created exactly once per accepted physical scan; never mutated or
/// deleted. Within a pair, ledger insertion order is event order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanEvent {
    /// Unique scan id
    pub id: Uuid,
    /// Badge that was scanned
    pub badge_id: String,
    /// Event the scan belongs to
    pub event_id: String,
    /// Scan kind
    pub scan_type: ScanType,
    /// Where the scan happened (e.g. "main_entrance")
    pub location: Option<String>,
    /// When the badge was read
    pub scanned_at: DateTime<Utc>,
    /// Server receive timestamp
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
    /// Operator who processed the scan
    pub recorded_by: Option<String>,
    /// Free-form operator notes
    pub operator_notes: Option<String>,
    /// Tracking session this scan was attributed to, if one was active
    pub session_id: Option<Uuid>,
}

impl ScanEvent {
    /// Creates a new scan event with a generated id.
    pub fn new(
        badge_id: impl Into<String>,
        event_id: impl Into<String>,
        scan_type: ScanType,
        scanned_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            badge_id: badge_id.into(),
            event_id: event_id.into(),
            scan_type,
            location: None,
            scanned_at,
            recorded_at: Utc::now(),
            recorded_by: None,
            operator_notes: None,
            session_id: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_operator(mut self, operator: Option<String>) -> Self {
        self.recorded_by = operator;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.operator_notes = notes;
        self
    }

    pub fn with_session(mut self, session_id: Option<Uuid>) -> Self {
        self.session_id = session_id;
        self
    }

    /// Returns the serialization key for this scan.
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.badge_id.clone(), self.event_id.clone())
    }
}

/// A scan request as submitted by scanning hardware or the operator UI.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Raw badge token from the QR payload or manual entry
    #[validate(length(min = 1, max = 512))]
    pub badge_token: String,
    /// Target event
    #[validate(length(min = 1, max = 64))]
    pub event_id: String,
    /// Scan kind
    pub scan_type: ScanType,
    /// Scan location
    #[validate(length(max = 100))]
    pub location: Option<String>,
    /// Operator notes
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Client-supplied scan timestamp; server time when absent
    pub scanned_at: Option<DateTime<Utc>>,
}

impl ScanRequest {
    pub fn new(
        badge_token: impl Into<String>,
        event_id: impl Into<String>,
        scan_type: ScanType,
    ) -> Self {
        Self {
            badge_token: badge_token.into(),
            event_id: event_id.into(),
            scan_type,
            location: None,
            notes: None,
            scanned_at: None,
        }
    }
}
