//! Test fixtures and payload builders.

use attendance_core::Attendee;
use attendance_store::MemoryDirectory;
use chrono::{DateTime, TimeZone, Utc};

/// Deterministic timestamp inside the test event's day.
pub fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 30, h, m, 0).unwrap()
}

/// Registered, active attendee with a numbered badge.
pub fn attendee(n: usize) -> Attendee {
    Attendee::new(
        format!("badge-{n:03}"),
        format!("Attendee {n}"),
        format!("attendee{n}@example.org"),
    )
}

/// Seeds `count` registered attendees into an event's roster.
pub fn seed_roster(directory: &MemoryDirectory, event_id: &str, count: usize) {
    for n in 0..count {
        directory.seed(event_id, attendee(n));
    }
}

/// Scan request payload as the scanning station sends it.
pub fn scan_payload(badge_token: &str, event_id: &str, scan_type: &str) -> serde_json::Value {
    serde_json::json!({
        "badgeToken": badge_token,
        "eventId": event_id,
        "scanType": scan_type,
    })
}

/// Scan payload with an explicit scan timestamp.
pub fn scan_payload_at(
    badge_token: &str,
    event_id: &str,
    scan_type: &str,
    scanned_at: DateTime<Utc>,
) -> serde_json::Value {
    serde_json::json!({
        "badgeToken": badge_token,
        "eventId": event_id,
        "scanType": scan_type,
        "scannedAt": scanned_at,
    })
}
