pub mod cli;
pub mod logging_system;

pub use cli::{Config, LogLevel};
pub use logging_system::setup_logging;

use crate::config::ConfigError;
use crate::console::{Console, LOG_SLOT, console, install_panic_bridge};
use crate::domain::{LevelSet, LogArg, RelayError};
use crate::sender::{HttpTransport, TransportConfig, TransportError};
use std::process;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Relay(#[from] RelayError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Logging system initialization failed: {0}")]
    Logging(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    console: &'static Console,
    transport: Arc<HttpTransport>,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, Box<dyn std::error::Error + Send + Sync>>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Config::from_args(args)?;
        Ok(Self::from_config(&config)?)
    }

    /// Wires the process console to an HTTP transport and starts interception.
    /// Must be called from inside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let raw = config.raw_config()?;
        let transport = Arc::new(HttpTransport::new(TransportConfig {
            base_url: config.base_url.clone(),
            ..TransportConfig::default()
        })?);

        let console = console();
        console.set_transport(transport.clone());
        console.init(raw)?;
        install_panic_bridge(console);

        if let Some(active) = console.config() {
            info!(
                "Starting console-relay v{} (server_url={}, threshold={})",
                crate::VERSION,
                active.server_url(),
                active.level_enabled_on_server()
            );
        }

        Ok(Self { console, transport })
    }

    pub fn console(&self) -> &'static Console {
        self.console
    }

    /// Relays stdin until EOF, then restores the console and waits for the
    /// sends still in flight.
    pub async fn run(self) -> Result<(), AppError> {
        let relayed = relay_lines(self.console, BufReader::new(tokio::io::stdin())).await;

        self.console.restore();
        self.transport.drain().await;

        let stats = self.transport.stats();
        info!(
            relayed = ?relayed.as_ref().ok(),
            dispatched = stats.dispatched(),
            delivered = stats.delivered(),
            failed = stats.failed(),
            avg_response_ms = stats.average_response_time().as_millis() as u64,
            "console-relay stopped"
        );
        relayed.map(|_| ())
    }
}

/// Splits a `<level>: <text>` line. Lines without a known level prefix are
/// returned whole with no level.
pub fn split_level<'a>(line: &'a str, levels: &LevelSet) -> (Option<&'a str>, &'a str) {
    if let Some((prefix, rest)) = line.split_once(':') {
        let prefix = prefix.trim();
        if prefix == LOG_SLOT || levels.contains(prefix) {
            return (Some(prefix), rest.trim_start());
        }
    }
    (None, line)
}

/// Logs every non-blank line of `reader` through `console`, returning how
/// many lines were relayed.
pub async fn relay_lines<R>(console: &Console, reader: R) -> Result<usize, AppError>
where
    R: AsyncBufRead + Unpin,
{
    let levels = console
        .config()
        .map(|config| config.levels().clone())
        .unwrap_or_default();

    let mut lines = reader.lines();
    let mut relayed = 0;
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let (level, text) = split_level(&line, &levels);
        let args = [LogArg::from(text)];
        let level = level.unwrap_or(LOG_SLOT);
        if console.call(level, &args).is_none() {
            console.log(&args);
        }
        relayed += 1;
    }
    Ok(relayed)
}

pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_args(std::env::args())?;

    if let Err(e) = setup_logging(config.log_level) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    let app = match App::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize console-relay: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("console-relay error: {e}");
        process::exit(1);
    }

    Ok(())
}
