//! API Integration Tests
//!
//! Each test spawns the real router on an ephemeral port with a manual clock,
//! so no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, assert_status, fixtures::*, test_config, TestServer,
};
use reqwest::StatusCode;

async fn record(server: &TestServer, request: &ActivityRequest) -> PresenceRecord {
    let response = server.post("/presence", request).await.unwrap();
    let body: Envelope<PresenceRecord> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(body.success);
    body.data
}

async fn list(server: &TestServer, path: &str) -> Vec<PresenceRecord> {
    let response = server.get(path).await.unwrap();
    let body: Envelope<Vec<PresenceRecord>> = assert_json(response, StatusCode::OK).await.unwrap();
    body.data
}

fn ids(records: &[PresenceRecord]) -> Vec<&str> {
    records.iter().map(|r| r.session_id.as_str()).collect()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready_reports_tracked_sessions() {
    let server = TestServer::start().await.expect("Failed to start server");
    record(&server, &ActivityRequest::unique("/home")).await;

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["trackedSessions"], 1);
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/presence").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ============================================================================
// Record Activity Tests
// ============================================================================

#[tokio::test]
async fn test_record_activity_creates_record() {
    let server = TestServer::start().await.unwrap();

    let created = record(
        &server,
        &ActivityRequest::new("abc", "/home")
            .user("u1")
            .user_agent(SAFARI_IPHONE_UA),
    )
    .await;

    assert_eq!(created.session_id, "abc");
    assert_eq!(created.user_id.as_deref(), Some("u1"));
    assert_eq!(created.first_seen_at, created.last_activity_at);
    assert_eq!(created.meta("page"), Some("/home"));
    assert_eq!(created.meta("referrer"), Some("direct"));
    assert_eq!(created.meta("device"), Some("mobile"));
    assert_eq!(created.meta("browser"), Some("safari"));
    assert_eq!(created.meta("os"), Some("ios"));
}

#[tokio::test]
async fn test_repeated_activity_preserves_first_seen() {
    let server = TestServer::start().await.unwrap();
    let first = record(&server, &ActivityRequest::new("abc", "/home")).await;

    server.advance_secs(45);
    let second = record(
        &server,
        &ActivityRequest::new("abc", "/pricing").referrer("https://news.example.com"),
    )
    .await;

    assert_eq!(second.first_seen_at, first.first_seen_at);
    assert!(second.last_activity_at > first.last_activity_at);
    assert_eq!(second.meta("page"), Some("/pricing"));
    assert_eq!(second.meta("referrer"), Some("https://news.example.com"));
}

#[tokio::test]
async fn test_record_activity_rejects_bad_input() {
    let server = TestServer::start().await.unwrap();

    // Missing sessionId
    let response = server
        .post("/presence", &serde_json::json!({ "page": "/home" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!body.success);
    assert!(!body.message.is_empty());

    // Missing userAgent and referrer
    let response = server
        .post("/presence", &serde_json::json!({ "sessionId": "abc", "page": "/home" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!body.success);

    // Blank userId, empty or whitespace
    for user_id in ["", "   "] {
        let response = server
            .post("/presence", &ActivityRequest::new("abc", "/home").user(user_id))
            .await
            .unwrap();
        assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
    }
    let response = server.get("/presence/abc").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    // Malformed sessionId
    let response = server
        .post("/presence", &ActivityRequest::new("has space", "/home"))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Empty page
    let response = server
        .post("/presence", &ActivityRequest::new("abc", ""))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    // Malformed JSON
    let response = server
        .post_raw("/presence", "application/json", "{not json")
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!body.success);
}

// ============================================================================
// Touch Tests
// ============================================================================

#[tokio::test]
async fn test_touch_updates_page() {
    let server = TestServer::start().await.unwrap();
    record(
        &server,
        &ActivityRequest::new("abc", "/home").user_agent(CHROME_WINDOWS_UA),
    )
    .await;

    server.advance_secs(20);
    let response = server
        .patch("/presence/abc", &TouchRequest::page("/cart").with_duration(20))
        .await
        .unwrap();
    let body: Envelope<PresenceRecord> = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body.data.meta("page"), Some("/cart"));
    assert_eq!(body.data.meta("duration"), Some("20"));
    assert_eq!(body.data.meta("browser"), Some("chrome"));
    assert!(body.data.last_activity_at > body.data.first_seen_at);
}

#[tokio::test]
async fn test_touch_requires_duration() {
    let server = TestServer::start().await.unwrap();
    record(&server, &ActivityRequest::new("abc", "/home")).await;

    let response = server
        .patch("/presence/abc", &serde_json::json!({ "page": "/cart" }))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert!(!body.success);
}

#[tokio::test]
async fn test_unknown_route_has_error_body() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/presence/a/b").await.unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "Route not found");
}

#[tokio::test]
async fn test_touch_unknown_session_is_404() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .patch("/presence/never-seen", &TouchRequest::page("/home"))
        .await
        .unwrap();
    let body: ErrorBody = assert_json(response, StatusCode::NOT_FOUND).await.unwrap();
    assert!(!body.success);
}

// ============================================================================
// Listing & Expiry Tests
// ============================================================================

#[tokio::test]
async fn test_expiry_scenario() {
    let server = TestServer::start().await.unwrap();

    record(&server, &ActivityRequest::new("abc", "/home")).await;
    server.advance_secs(120);
    let response = server
        .patch("/presence/abc", &TouchRequest::page("/cart"))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    // t = 200s
    server.advance_secs(80);
    let active = list(&server, "/presence").await;
    assert_eq!(ids(&active), vec!["abc"]);
    assert_eq!(active[0].meta("page"), Some("/cart"));

    // t = 500s
    server.advance_secs(300);
    assert!(list(&server, "/presence").await.is_empty());

    let response = server.delete("/presence/inactive").await.unwrap();
    let body: Envelope<Removed> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.removed_count, 1);

    let response = server.get("/presence/abc").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_list_is_ordered_most_recent_first() {
    let server = TestServer::start().await.unwrap();

    server.advance_secs(10);
    record(&server, &ActivityRequest::new("t10", "/")).await;
    server.advance_secs(20);
    record(&server, &ActivityRequest::new("t30", "/")).await;
    server.advance_secs(-10);
    record(&server, &ActivityRequest::new("t20", "/")).await;

    let active = list(&server, "/presence").await;
    assert_eq!(ids(&active), vec!["t30", "t20", "t10"]);
}

#[tokio::test]
async fn test_threshold_override() {
    let server = TestServer::start().await.unwrap();

    record(&server, &ActivityRequest::new("old", "/")).await;
    server.advance_secs(90);
    record(&server, &ActivityRequest::new("new", "/")).await;

    assert_eq!(ids(&list(&server, "/presence").await), vec!["new", "old"]);
    assert_eq!(ids(&list(&server, "/presence?thresholdSecs=60").await), vec!["new"]);

    let response = server.get("/presence?thresholdSecs=90000").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let response = server.get("/presence?thresholdSecs=-5").await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_purge_is_idempotent() {
    let server = TestServer::start().await.unwrap();

    record(&server, &ActivityRequest::new("a", "/")).await;
    record(&server, &ActivityRequest::new("b", "/")).await;
    server.advance_secs(400);
    record(&server, &ActivityRequest::new("c", "/")).await;

    for expected in [2, 0] {
        let response = server.delete("/presence/inactive").await.unwrap();
        let body: Envelope<Removed> = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(body.data.removed_count, expected);
    }

    assert_eq!(ids(&list(&server, "/presence").await), vec!["c"]);
}

// ============================================================================
// Get / Remove Tests
// ============================================================================

#[tokio::test]
async fn test_get_returns_stale_record_until_purged() {
    let server = TestServer::start().await.unwrap();
    record(&server, &ActivityRequest::new("abc", "/home")).await;
    server.advance_secs(1_000);

    let response = server.get("/presence/abc").await.unwrap();
    let body: Envelope<PresenceRecord> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.session_id, "abc");
}

#[tokio::test]
async fn test_remove_session() {
    let server = TestServer::start().await.unwrap();
    record(&server, &ActivityRequest::new("abc", "/home")).await;

    let response = server.delete("/presence/abc").await.unwrap();
    let body: Envelope<Removed> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.removed_count, 1);

    let response = server.delete("/presence/abc").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let response = server.get("/presence/abc").await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

// ============================================================================
// Stats Tests
// ============================================================================

#[tokio::test]
async fn test_stats() {
    let server = TestServer::start().await.unwrap();

    record(&server, &ActivityRequest::new("gone", "/old").user("u9")).await;
    server.advance_secs(600);

    record(
        &server,
        &ActivityRequest::new("a", "/home")
            .user("u1")
            .user_agent(SAFARI_IPHONE_UA),
    )
    .await;
    record(
        &server,
        &ActivityRequest::new("b", "/home")
            .user("u2")
            .user_agent(CHROME_WINDOWS_UA),
    )
    .await;
    record(
        &server,
        &ActivityRequest::new("c", "/cart").user_agent(CHROME_WINDOWS_UA),
    )
    .await;

    let response = server.get("/presence/stats").await.unwrap();
    let body: Envelope<Summary> = assert_json(response, StatusCode::OK).await.unwrap();
    let stats = body.data;

    assert_eq!(stats.active_count, 3);
    assert_eq!(stats.total_tracked, 4);
    assert_eq!(stats.by_page.get("/home"), Some(&2));
    assert_eq!(stats.by_page.get("/cart"), Some(&1));
    assert_eq!(stats.by_device.get("desktop"), Some(&2));
    assert_eq!(stats.by_device.get("mobile"), Some(&1));
    assert_eq!(stats.by_browser.get("chrome"), Some(&2));
    assert_eq!(stats.by_os.get("ios"), Some(&1));
    assert_eq!(stats.identified_users, 2);
    assert_eq!(stats.threshold_secs, 300);
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[tokio::test]
async fn test_configured_threshold_applies() {
    let mut config = test_config();
    config.presence.inactivity_threshold_secs = 30;
    let server = TestServer::start_with_config(config).await.unwrap();

    record(&server, &ActivityRequest::new("abc", "/")).await;
    server.advance_secs(31);

    assert!(list(&server, "/presence").await.is_empty());
    let response = server.delete("/presence/inactive").await.unwrap();
    let body: Envelope<Removed> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body.data.removed_count, 1);
}

#[tokio::test]
async fn test_rate_limit_applies_to_presence_routes_only() {
    let mut config = test_config();
    config.rate_limit.requests_per_second = 1;
    config.rate_limit.burst = 2;
    let server = TestServer::start_with_config(config).await.unwrap();

    let mut limited = None;
    for _ in 0..10 {
        let response = server.get("/presence").await.unwrap();
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            limited = Some(response);
            break;
        }
    }
    let response = limited.expect("rate limit never triggered");
    let body: ErrorBody = assert_json(response, StatusCode::TOO_MANY_REQUESTS)
        .await
        .unwrap();
    assert!(!body.success);
    assert_eq!(body.message, "Too many requests");

    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}
