use console_collector::app::{router, server};
use console_collector::port::TracingSink;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Test that healthcheck succeeds against the real collector router
#[tokio::test]
async fn test_healthcheck_succeeds_when_server_running() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let shutdown = CancellationToken::new();
    let app = router(Arc::new(TracingSink), "/logs");
    let handle = tokio::spawn(server::serve_on(listener, app, shutdown.clone()));

    // Wait for server to start
    sleep(Duration::from_millis(100)).await;

    let result = console_collector::healthcheck_with_port(port).await;
    assert!(
        result.is_ok(),
        "Healthcheck should succeed when server is running"
    );

    shutdown.cancel();
    let served = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server stops after cancellation")
        .unwrap();
    assert!(served.is_ok());
}

/// Test that healthcheck fails when server is not running
#[tokio::test]
async fn test_healthcheck_fails_when_server_not_running() {
    let port = free_port();

    let result = console_collector::healthcheck_with_port(port).await;
    assert!(
        result.is_err(),
        "Healthcheck should fail when server is not running"
    );
}

/// Test that healthcheck fails when server returns non-2xx status
#[tokio::test]
async fn test_healthcheck_fails_on_non_success_status() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let mock_server = tokio::spawn(async move {
        let app = axum::Router::new().route(
            "/v1/health",
            axum::routing::get(|| async {
                (axum::http::StatusCode::SERVICE_UNAVAILABLE, "Unhealthy")
            }),
        );
        axum::serve(listener, app).await.unwrap();
    });

    sleep(Duration::from_millis(100)).await;

    let result = console_collector::healthcheck_with_port(port).await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("503"));

    mock_server.abort();
}
