//! Scan validation rules.
//!
//! A rejection is a business outcome, not a fault: it is returned to the
//! caller as a typed value together with the attendee's actual state so
//! the operator can decide the correct action.
//!
//! Rejection codes:
//! - SCAN_001: check-in without registration
//! - SCAN_002: duplicate check-in
//! - SCAN_003: check-out without check-in
//! - SCAN_004: deactivated badge

use serde::{Deserialize, Serialize};

use crate::badge::Attendee;
use crate::scan::ScanType;
use crate::state::{AttendanceState, AttendanceStatus};

/// Why a scan was not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// SCAN_001: attendee exists but is not registered for this event
    UnregisteredCheckIn,
    /// SCAN_002: attendee is already checked in
    DuplicateCheckIn,
    /// SCAN_003: check-out while not checked in
    CheckOutWithoutCheckIn,
    /// SCAN_004: badge has been deactivated
    BadgeDeactivated,
}

impl RejectReason {
    /// Get the rejection code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnregisteredCheckIn => "SCAN_001",
            Self::DuplicateCheckIn => "SCAN_002",
            Self::CheckOutWithoutCheckIn => "SCAN_003",
            Self::BadgeDeactivated => "SCAN_004",
        }
    }

    /// Operator-facing message, including the remediation path.
    pub fn message(&self) -> &'static str {
        match self {
            Self::UnregisteredCheckIn => {
                "Attendee is not registered for this event. Register first, then check in."
            }
            Self::DuplicateCheckIn => {
                "Already checked in. Check out first before checking in again."
            }
            Self::CheckOutWithoutCheckIn => "Not currently checked in. Check in first.",
            Self::BadgeDeactivated => "This badge has been deactivated. Contact support.",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

/// Deployment policy switches for scan validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconcilePolicy {
    /// Accept a check-out with no preceding check-in (manual
    /// data-correction imports). The fold then marks the attendee
    /// checked out without accruing minutes.
    ///
    /// Aliases cover config-file loaders that lowercase or
    /// snake-case keys.
    #[serde(alias = "allowrawcheckout", alias = "allow_raw_checkout")]
    pub allow_raw_checkout: bool,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            allow_raw_checkout: false,
        }
    }
}

/// Validates a scan against the attendee record and current state.
///
/// Rules are applied in order; the first violation wins. Verification
/// scans are accepted for any active badge and never alter status.
pub fn validate_scan(
    scan_type: ScanType,
    attendee: &Attendee,
    state: &AttendanceState,
    policy: &ReconcilePolicy,
) -> Result<(), RejectReason> {
    if !attendee.active {
        return Err(RejectReason::BadgeDeactivated);
    }

    match scan_type {
        ScanType::CheckIn => {
            if !attendee.is_registered {
                return Err(RejectReason::UnregisteredCheckIn);
            }
            if state.current_status == AttendanceStatus::CheckedIn {
                return Err(RejectReason::DuplicateCheckIn);
            }
        }
        ScanType::CheckOut => {
            if state.current_status != AttendanceStatus::CheckedIn && !policy.allow_raw_checkout {
                return Err(RejectReason::CheckOutWithoutCheckIn);
            }
        }
        ScanType::Verification => {}
    }

    Ok(())
}
