use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber.
///
/// Uses JSON format when `RUST_LOG_FORMAT=json` (default for production).
/// Re-emitted console events are logged under the `console` target, so
/// `RUST_LOG=console=warn` narrows the output to warnings and errors.
pub fn init_tracing() {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(true);

    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let result = if use_json {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing already initialized: {e}");
    }
}
