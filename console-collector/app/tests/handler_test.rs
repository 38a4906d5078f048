use axum_test::TestServer;
use console_collector::app::router;
use console_collector::domain::Severity;
use console_collector::port::EventSink;
use console_collector::test_support::CapturingSink;
use serde_json::json;
use std::sync::Arc;

fn create_test_server(logs_path: &str) -> (TestServer, Arc<CapturingSink>) {
    let capture = Arc::new(CapturingSink::new());
    let sink: Arc<dyn EventSink> = capture.clone();
    let server = TestServer::new(router(sink, logs_path)).unwrap();
    (server, capture)
}

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let (server, _) = create_test_server("/logs");

    let response = server.get("/v1/health").await;

    response.assert_status_ok();
    response.assert_text("Healthy");
}

#[tokio::test]
async fn test_logs_endpoint_emits_event_at_its_level() {
    let (server, capture) = create_test_server("/logs");

    let response = server
        .post("/logs")
        .add_header("referer", "http://localhost:1337/")
        .add_header("user-agent", "console-relay/0.1.0")
        .json(&json!({
            "level": "warn",
            "message": "a, b",
            "stackTrace": "at f (file.js:10:3)",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    assert_eq!(
        capture.events(),
        [(
            Severity::Warn,
            "[http://localhost:1337/] console-relay/0.1.0\na, b\nat f (file.js:10:3)\n".to_string()
        )]
    );
}

#[tokio::test]
async fn test_unknown_level_is_ignored() {
    let (server, capture) = create_test_server("/logs");

    let response = server
        .post("/logs")
        .json(&json!({ "level": "fatal", "message": "x" }))
        .await;

    response.assert_status(axum::http::StatusCode::NO_CONTENT);
    assert!(capture.events().is_empty());
}

#[tokio::test]
async fn test_missing_level_and_bad_json_are_ignored() {
    let (server, capture) = create_test_server("/logs");

    server
        .post("/logs")
        .json(&json!({ "message": "no level" }))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .post("/logs")
        .text("{not json")
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    assert!(capture.events().is_empty());
}

#[tokio::test]
async fn test_log_level_maps_to_log_severity() {
    let (server, capture) = create_test_server("/logs");

    server
        .post("/logs")
        .json(&json!({ "level": "log", "message": "plain" }))
        .await;

    let events = capture.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Severity::Log);
    assert_eq!(events[0].1, "[-] -\nplain\n");
}

#[tokio::test]
async fn test_custom_logs_path() {
    let (server, capture) = create_test_server("/api/console");

    server
        .post("/logs")
        .json(&json!({ "level": "info", "message": "x" }))
        .await
        .assert_status_not_found();
    server
        .post("/api/console")
        .json(&json!({ "level": "info", "message": "x" }))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    assert_eq!(capture.events().len(), 1);
}

#[tokio::test]
async fn test_get_on_logs_path_is_not_allowed() {
    let (server, _) = create_test_server("/logs");
    server
        .get("/logs")
        .await
        .assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
}
