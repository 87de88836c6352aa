//! Field and timing limits for the attendance engine.
//!
//! Limits bound memory per request and keep badge scanning interactive:
//! an operator holding a scanner gets an answer or a failure within a
//! few seconds, never a hung request.
//!
//! # Usage Note
//!
//! The `#[validate]` derive macro requires literal values in attributes,
//! so field limits are duplicated there. Keep both in sync when modifying.

// === Badge Token Limits ===

/// Maximum raw badge token length in bytes.
///
/// QR payloads are either bare ids (~20 chars) or short URLs with an
/// embedded `badgeId` parameter. 512 covers both with headroom.
pub const MAX_BADGE_TOKEN_LEN: usize = 512;

/// Maximum resolved badge id length.
///
/// Generated ids look like `CBA-20250830-...` and stay under 64.
pub const MAX_BADGE_ID_LEN: usize = 64;

// === Scan Field Limits (chars) ===

/// Event id max length.
pub const MAX_EVENT_ID_LEN: usize = 64;

/// Scan location max length (e.g. "main_entrance", "exhibition_hall").
pub const MAX_LOCATION_LEN: usize = 100;

/// Operator notes max length.
pub const MAX_NOTES_LEN: usize = 1000;

/// Operator identifier max length.
pub const MAX_OPERATOR_LEN: usize = 128;

// === Attendee Field Limits (chars) ===

/// Display name max length.
pub const MAX_DISPLAY_NAME_LEN: usize = 200;

/// Email max length (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;

/// Participant type label max length.
pub const MAX_PARTICIPANT_TYPE_LEN: usize = 64;

// === Timing ===

/// Maximum allowed clock skew for future scan timestamps (seconds).
pub const MAX_FUTURE_SKEW_SECS: i64 = 5;

/// Default timeout for directory lookups (seconds).
///
/// Scanning hardware is interactive; a lookup that takes longer than
/// this is treated as failed and the operator re-scans.
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 3;

/// Default timeout for ledger appends (seconds).
pub const DEFAULT_APPEND_TIMEOUT_SECS: u64 = 3;

// === History ===

/// Maximum number of recent scans returned per event history query.
pub const MAX_HISTORY_LIMIT: usize = 100;

/// Default number of recent scans returned when no limit is given.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
