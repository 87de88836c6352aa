//! Event statistics and attendee state reads.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, SecondsFormat, Utc};
use integration_tests::{fixtures, setup::TestContext};

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

async fn check_in(server: &TestServer, badge: &str, minute: u32) {
    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            badge,
            "evt-1",
            "check_in",
            fixtures::at(10, minute),
        ))
        .await;
    response.assert_status(StatusCode::OK);
}

/// 6 of 10 roster members scanned in: 60% attendance.
#[tokio::test]
async fn test_attendance_rate_is_rounded_percentage() {
    let ctx = TestContext::new();
    fixtures::seed_roster(&ctx.directory, "evt-1", 10);
    let server = server(&ctx);

    for n in 0..6 {
        check_in(&server, &format!("badge-{n:03}"), n as u32).await;
    }

    let response = server.get("/events/evt-1/stats").await;
    response.assert_status(StatusCode::OK);
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["registered"], 10);
    assert_eq!(stats["attended"], 6);
    assert_eq!(stats["attendanceRate"], 60);
    assert_eq!(stats["pending"], 4);
    assert_eq!(stats["noShow"], 0);
    assert_eq!(stats["inVenue"], 6);
}

/// Unscanned roster members become no-shows once the cutoff passes.
#[tokio::test]
async fn test_cutoff_switches_pending_to_no_show() {
    let ctx = TestContext::new();
    fixtures::seed_roster(&ctx.directory, "evt-1", 2);
    let server = server(&ctx);
    check_in(&server, "badge-000", 0).await;

    // "Z" suffix keeps the timestamp query-string safe ("+" would
    // decode as a space).
    let future = (Utc::now() + Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let response = server
        .get(&format!("/events/evt-1/stats?cutoff={future}"))
        .await;
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["pending"], 1);
    assert_eq!(stats["noShow"], 0);

    let past = (Utc::now() - Duration::hours(1)).to_rfc3339_opts(SecondsFormat::Secs, true);
    let response = server
        .get(&format!("/events/evt-1/stats?cutoff={past}"))
        .await;
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["pending"], 0);
    assert_eq!(stats["noShow"], 1);
}

/// An event with no roster reports a zero rate, not an error.
#[tokio::test]
async fn test_empty_roster_reports_zero_rate() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server.get("/events/evt-9/stats").await;
    response.assert_status(StatusCode::OK);
    let stats: serde_json::Value = response.json();
    assert_eq!(stats["registered"], 0);
    assert_eq!(stats["attendanceRate"], 0);
}

/// Attendee state replays check-in/out history.
#[tokio::test]
async fn test_attendee_state_read() {
    let ctx = TestContext::new();
    fixtures::seed_roster(&ctx.directory, "evt-1", 1);
    let server = server(&ctx);

    check_in(&server, "badge-000", 0).await;
    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "badge-000",
            "evt-1",
            "check_out",
            fixtures::at(10, 45),
        ))
        .await;
    response.assert_status(StatusCode::OK);

    let response = server
        .get("/attendees/badge-000/state?eventId=evt-1")
        .await;
    response.assert_status(StatusCode::OK);
    let state: serde_json::Value = response.json();
    assert_eq!(state["status"], "checked_out");
    assert_eq!(state["totalMinutes"], 45);
    assert_eq!(state["sessionCount"], 1);

    // Unknown badges 404; known badges with no scans return empty state.
    let response = server
        .get("/attendees/badge-999/state?eventId=evt-1")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
