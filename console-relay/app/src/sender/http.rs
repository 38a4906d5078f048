use super::{Transport, TransportError};
use crate::domain::LogEvent;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace};
use url::Url;

#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Base that relative server URLs (e.g. `/logs`) are resolved against.
    pub base_url: Option<Url>,
    pub timeout: Duration,
    pub connection_timeout: Duration,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(10),
            connection_timeout: Duration::from_secs(5),
            user_agent: format!("console-relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Default)]
pub struct TransportStats {
    dispatched: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    total_response_time: AtomicU64,
}

impl TransportStats {
    fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_outcome(&self, success: bool, response_time: Duration) {
        self.total_response_time
            .fetch_add(response_time.as_millis() as u64, Ordering::Relaxed);
        if success {
            self.delivered.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn average_response_time(&self) -> Duration {
        let completed = self.delivered() + self.failed();
        if completed == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.total_response_time.load(Ordering::Relaxed) / completed)
    }
}

/// JSON-over-HTTP transport. Each dispatch spawns one POST on the runtime the
/// transport was created on; nobody waits for it unless [`Self::drain`] is
/// called.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
    runtime: Handle,
    tracker: TaskTracker,
    stats: Arc<TransportStats>,
}

impl HttpTransport {
    /// Builds a transport bound to the current tokio runtime.
    pub fn new(config: TransportConfig) -> Result<Self, TransportError> {
        let runtime = Handle::try_current()
            .map_err(|e| TransportError::MissingRuntime(e.to_string()))?;
        Self::with_handle(config, runtime)
    }

    pub fn with_handle(config: TransportConfig, runtime: Handle) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connection_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            config,
            runtime,
            tracker: TaskTracker::new(),
            stats: Arc::new(TransportStats::default()),
        })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }

    /// Resolves `url`, joining relative forms onto the configured base.
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.config.base_url {
                Some(base) => base.join(url).map_err(|e| invalid(e.to_string())),
                None => Err(invalid("relative URL without a base".to_string())),
            },
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Waits for every send dispatched so far to finish.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}

impl Transport for HttpTransport {
    fn dispatch(&self, url: &str, event: &LogEvent) -> Result<(), TransportError> {
        let target = self.resolve(url)?;
        let body = serde_json::to_vec(event)?;
        let request = self
            .client
            .post(target)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let stats = Arc::clone(&self.stats);
        stats.record_dispatch();
        self.tracker.spawn_on(
            async move {
                let start = Instant::now();
                match request.send().await {
                    Ok(response) => {
                        let status = response.status();
                        stats.record_outcome(status.is_success(), start.elapsed());
                        trace!(target: "console_relay", %status, "console event delivered");
                    }
                    Err(e) => {
                        stats.record_outcome(false, start.elapsed());
                        debug!(target: "console_relay", "console event delivery failed: {e}");
                    }
                }
            },
            &self.runtime,
        );
        Ok(())
    }
}
