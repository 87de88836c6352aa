//! End-to-end scan flows through the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

/// Full day at the venue: check in, verify, check out, re-enter.
#[tokio::test]
async fn test_check_in_out_reentry_accrues_minutes() {
    let ctx = TestContext::new();
    ctx.seed("evt-1", fixtures::attendee(1));
    let server = server(&ctx);

    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "badge-001",
            "evt-1",
            "check_in",
            fixtures::at(10, 0),
        ))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert_eq!(body["firstCheckIn"], true);
    assert_eq!(body["state"]["currentStatus"], "checked_in");

    // Verification mid-visit does not change status.
    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "badge-001",
            "evt-1",
            "verification",
            fixtures::at(10, 20),
        ))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert_eq!(body["state"]["currentStatus"], "checked_in");
    assert_eq!(body["state"]["cumulativeMinutes"], 0);

    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "badge-001",
            "evt-1",
            "check_out",
            fixtures::at(10, 45),
        ))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert_eq!(body["state"]["currentStatus"], "checked_out");
    assert_eq!(body["state"]["cumulativeMinutes"], 45);
    assert_eq!(body["sessionMinutes"], 45);

    // Re-entry opens a second session.
    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "badge-001",
            "evt-1",
            "check_in",
            fixtures::at(11, 0),
        ))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert_eq!(body["firstCheckIn"], false);
    assert_eq!(body["state"]["currentStatus"], "checked_in");
    assert_eq!(body["state"]["cumulativeMinutes"], 45);

    assert_eq!(ctx.scan_count(), 4);
}

/// Embedded badgeId QR payloads resolve like bare ids.
#[tokio::test]
async fn test_embedded_token_is_accepted() {
    let ctx = TestContext::new();
    ctx.seed("evt-1", fixtures::attendee(1));
    let server = server(&ctx);

    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload_at(
            "https://events.example.org/scan?badgeId=badge-001",
            "evt-1",
            "check_in",
            fixtures::at(9, 0),
        ))
        .await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert_eq!(body["state"]["badgeId"], "badge-001");
}

/// The X-Operator header is recorded on the scan.
#[tokio::test]
async fn test_operator_header_is_recorded() {
    let ctx = TestContext::new();
    ctx.seed("evt-1", fixtures::attendee(1));
    let server = server(&ctx);

    let response = server
        .post("/scans")
        .add_header("X-Operator", "front-desk-1")
        .json(&fixtures::scan_payload_at(
            "badge-001",
            "evt-1",
            "check_in",
            fixtures::at(9, 0),
        ))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["scan"]["recordedBy"], "front-desk-1");
}

/// Recent scans come back newest first and respect the limit.
#[tokio::test]
async fn test_recent_scans_newest_first() {
    let ctx = TestContext::new();
    for n in 0..3 {
        ctx.seed("evt-1", fixtures::attendee(n));
    }
    let server = server(&ctx);

    for (n, minute) in [(0, 0), (1, 5), (2, 10)] {
        let response = server
            .post("/scans")
            .json(&fixtures::scan_payload_at(
                &format!("badge-{n:03}"),
                "evt-1",
                "check_in",
                fixtures::at(9, minute),
            ))
            .await;
        response.assert_status(StatusCode::OK);
    }

    let response = server.get("/events/evt-1/scans?limit=2").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    let scans = body["scans"].as_array().unwrap();
    assert_eq!(scans.len(), 2);
    assert_eq!(scans[0]["badgeId"], "badge-002");
    assert_eq!(scans[1]["badgeId"], "badge-001");
}
