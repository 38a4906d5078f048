mod router;
pub mod server;
pub mod tracing;

pub use router::{HEALTH_PATH, router};

use crate::config;
use crate::error::CollectorError;
use crate::port::{EventSink, TracingSink};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), CollectorError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        http_port = settings.http_port,
        logs_path = %settings.logs_path,
        "Loaded settings"
    );

    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let app = router(sink, &settings.logs_path);

    server::serve(app, settings.http_port, CancellationToken::new()).await
}
