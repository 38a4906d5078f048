use console_relay::sender::{HttpTransport, Transport, TransportConfig, TransportError};
use console_relay::test_support::RecordingTransport;
use console_relay::{Console, LogEvent, log_args};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(TransportConfig {
        base_url: Some(Url::parse(&server.uri()).unwrap()),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_dispatch_posts_json_event() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "level": "warn", "message": "a, b" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    transport
        .dispatch("/logs", &LogEvent::new("warn", "a, b"))
        .unwrap();
    transport.drain().await;

    assert_eq!(transport.stats().dispatched(), 1);
    assert_eq!(transport.stats().delivered(), 1);
    assert_eq!(transport.stats().failed(), 0);
}

#[tokio::test]
async fn test_stack_trace_key_is_sent_when_present() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs"))
        .and(body_json(json!({
            "level": "error",
            "message": "x",
            "stackTrace": "at a\nat b",
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    let mut event = LogEvent::new("error", "x");
    event.stack_trace = Some("at a\nat b".to_string());
    transport.dispatch("/logs", &event).unwrap();
    transport.drain().await;
}

#[tokio::test]
async fn test_server_errors_are_counted_not_raised() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    assert!(transport.dispatch("/logs", &LogEvent::new("error", "x")).is_ok());
    transport.drain().await;

    assert_eq!(transport.stats().failed(), 1);
    assert_eq!(transport.stats().delivered(), 0);
}

#[tokio::test]
async fn test_average_response_time_covers_slow_replies() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(50)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let transport = transport_for(&mock_server);
    for message in ["a", "b"] {
        transport
            .dispatch("/logs", &LogEvent::new("warn", message))
            .unwrap();
    }
    transport.drain().await;

    assert_eq!(transport.stats().delivered(), 2);
    assert!(transport.stats().average_response_time() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_absolute_url_ignores_base() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = HttpTransport::new(TransportConfig::default()).unwrap();
    let url = format!("{}/elsewhere", mock_server.uri());
    transport.dispatch(&url, &LogEvent::new("info", "hi")).unwrap();
    transport.drain().await;
}

#[tokio::test]
async fn test_relative_url_without_base_is_rejected() {
    let transport = HttpTransport::new(TransportConfig::default()).unwrap();
    let err = transport
        .dispatch("/logs", &LogEvent::new("info", "hi"))
        .unwrap_err();
    assert!(matches!(err, TransportError::InvalidUrl { .. }));
    assert_eq!(transport.stats().dispatched(), 0);
}

#[test]
fn test_new_outside_runtime_is_missing_runtime() {
    let err = HttpTransport::new(TransportConfig::default()).unwrap_err();
    assert!(matches!(err, TransportError::MissingRuntime(_)));
}

#[tokio::test]
async fn test_console_forwards_through_http() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/logs"))
        .and(body_json(json!({ "level": "warn", "message": "disk low, 93" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let transport = Arc::new(transport_for(&mock_server));
    let console = Console::with_tracing_sinks().with_transport(transport.clone());
    console.init(json!({ "serverUrl": "/logs" })).unwrap();

    console.warn(&log_args!["disk low", 93]);
    console.restore();
    console.warn(&log_args!["after restore"]);
    transport.drain().await;

    assert_eq!(transport.stats().dispatched(), 1);
    assert_eq!(transport.stats().delivered(), 1);
}

#[test]
fn test_recording_transport_keeps_urls() {
    let transport = RecordingTransport::new();
    transport.dispatch("/a", &LogEvent::new("info", "1")).unwrap();
    transport.dispatch("/b", &LogEvent::new("warn", "2")).unwrap();
    let urls: Vec<String> = transport.sent().into_iter().map(|(url, _)| url).collect();
    assert_eq!(urls, ["/a", "/b"]);
    transport.clear();
    assert_eq!(transport.count(), 0);
}
