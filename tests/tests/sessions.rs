//! Scan session lifecycle through the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

fn server(ctx: &TestContext) -> TestServer {
    TestServer::new(ctx.router.clone()).expect("Failed to create test server")
}

/// Start, scan, end: counters land on the persisted session.
#[tokio::test]
async fn test_session_lifecycle_and_attribution() {
    let ctx = TestContext::new();
    ctx.seed("evt-1", fixtures::attendee(1));
    ctx.seed("evt-1", fixtures::attendee(2));
    let server = server(&ctx);

    let response = server
        .post("/sessions/start")
        .add_header("X-Operator", "organizer-1")
        .json(&serde_json::json!({ "eventId": "evt-1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let session: serde_json::Value = response.json();
    let session_id = session["id"].as_str().unwrap().to_string();
    assert_eq!(session["startedBy"], "organizer-1");
    assert!(session["endedAt"].is_null());

    // Two attendees check in, one checks out: three attributed scans,
    // two unique badges, one duplicate.
    for (badge, scan_type, minute) in [
        ("badge-001", "check_in", 0),
        ("badge-002", "check_in", 5),
        ("badge-001", "check_out", 30),
    ] {
        let response = server
            .post("/scans")
            .json(&fixtures::scan_payload_at(
                badge,
                "evt-1",
                scan_type,
                fixtures::at(10, minute),
            ))
            .await;
        let body: serde_json::Value = response.json();
        assert_eq!(body["accepted"], true);
        assert_eq!(body["scan"]["sessionId"], session_id.as_str());
    }

    let response = server.get(&format!("/sessions/{session_id}")).await;
    let session: serde_json::Value = response.json();
    assert_eq!(session["totalScans"], 3);
    assert_eq!(session["uniqueAttendees"], 2);
    assert_eq!(session["duplicateScans"], 1);

    let response = server
        .post(&format!("/sessions/{session_id}/end"))
        .await;
    response.assert_status(StatusCode::OK);
    let ended: serde_json::Value = response.json();
    assert!(!ended["endedAt"].is_null());
    assert_eq!(ended["totalScans"], 3);

    // Ending again is an idempotent no-op.
    let response = server
        .post(&format!("/sessions/{session_id}/end"))
        .await;
    response.assert_status(StatusCode::OK);
    let again: serde_json::Value = response.json();
    assert_eq!(again["endedAt"], ended["endedAt"]);
}

/// One active session per event.
#[tokio::test]
async fn test_second_start_conflicts() {
    let ctx = TestContext::new();
    let server = server(&ctx);

    let response = server
        .post("/sessions/start")
        .json(&serde_json::json!({ "eventId": "evt-1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let session: serde_json::Value = response.json();
    let session_id = session["id"].as_str().unwrap().to_string();

    let response = server
        .post("/sessions/start")
        .json(&serde_json::json!({ "eventId": "evt-1" }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SESSION_001");

    // Another event is unaffected.
    let response = server
        .post("/sessions/start")
        .json(&serde_json::json!({ "eventId": "evt-2" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    // After ending, the event can start a fresh session.
    server.post(&format!("/sessions/{session_id}/end")).await;
    let response = server
        .post("/sessions/start")
        .json(&serde_json::json!({ "eventId": "evt-1" }))
        .await;
    response.assert_status(StatusCode::CREATED);
}

/// Scans with no active session are valid but unattributed.
#[tokio::test]
async fn test_scan_without_session_is_unattributed() {
    let ctx = TestContext::new();
    ctx.seed("evt-1", fixtures::attendee(1));
    let server = server(&ctx);

    let response = server
        .post("/scans")
        .json(&fixtures::scan_payload("badge-001", "evt-1", "check_in"))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);
    assert!(body["scan"]["sessionId"].is_null());
}

/// Unknown session ids return SESSION_002.
#[tokio::test]
async fn test_unknown_session_returns_404() {
    let ctx = TestContext::new();
    let server = server(&ctx);
    let missing = uuid::Uuid::new_v4();

    let response = server.get(&format!("/sessions/{missing}")).await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "SESSION_002");

    let response = server.post(&format!("/sessions/{missing}/end")).await;
    response.assert_status(StatusCode::NOT_FOUND);
}
