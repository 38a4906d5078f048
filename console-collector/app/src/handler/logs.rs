use crate::domain::{IncomingEvent, Origin};
use crate::port::EventSink;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use std::sync::Arc;
use tracing::{debug, warn};

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Handler for POST on the logs route (events from console-relay).
///
/// Always answers 204: malformed bodies and unknown levels are dropped here.
pub async fn logs_handler(
    State(sink): State<Arc<dyn EventSink>>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    let event: IncomingEvent = match serde_json::from_str(&body) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to parse console event: {e}");
            return StatusCode::NO_CONTENT;
        }
    };

    let Some(severity) = event.severity() else {
        debug!(level = ?event.level, "Ignoring console event with unknown level");
        return StatusCode::NO_CONTENT;
    };

    let origin = Origin {
        referer: header_text(&headers, header::REFERER),
        user_agent: header_text(&headers, header::USER_AGENT),
    };
    sink.emit(severity, &event.render(&origin));
    StatusCode::NO_CONTENT
}
