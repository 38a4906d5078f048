use crate::handler::health::health_handler;
use crate::handler::logs::logs_handler;
use crate::port::EventSink;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub const HEALTH_PATH: &str = "/v1/health";

/// Build the HTTP router (health + console events on `logs_path`).
pub fn router(sink: Arc<dyn EventSink>, logs_path: &str) -> Router {
    let health_router = Router::new().route(HEALTH_PATH, get(health_handler));

    let logs_router = Router::new()
        .route(logs_path, post(logs_handler))
        .with_state(sink);

    Router::new().merge(health_router).merge(logs_router)
}
