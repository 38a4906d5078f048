use super::proxy::{self, LOG_SLOT, OriginalFunctions, isolate};
use super::session::Session;
use super::{Console, ErrorHandler, error_hook};
use crate::config::{Configuration, RawConfig};
use crate::domain::{LogArg, RelayError};
use crate::sender::{HttpTransport, Transport, TransportConfig};
use std::sync::Arc;
use tracing::debug;

/// State of an active interception session.
pub(crate) struct InterceptionState {
    config: Arc<Configuration>,
    originals: OriginalFunctions,
    error_handler: Option<ErrorHandler>,
}

impl Console {
    /// Starts (or restarts) interception with `raw`.
    ///
    /// Any previous session is restored first, so calling `init` twice leaves
    /// the console exactly as a single call with the second configuration.
    /// The only error is a missing transport capability.
    pub fn init(&self, raw: impl Into<RawConfig>) -> Result<&Self, RelayError> {
        self.restore();
        let transport = self.resolve_transport()?;

        let config = Arc::new(self.read_config(&raw.into()));
        let session = Arc::new(Session::new(
            Arc::clone(&config),
            transport,
            self.trace_extractor(),
        ));

        let originals =
            proxy::install_proxies(self, &config, &session, OriginalFunctions::new());
        let mut error_handler = None;
        error_hook::apply(self, &config, Some(&session), &mut error_handler);

        debug!(
            target: "console_relay",
            levels = ?config.levels().as_slice(),
            server_url = config.server_url(),
            log_errors = config.log_errors(),
            "console interception started"
        );

        *self.state.lock() = Some(InterceptionState {
            config,
            originals,
            error_handler,
        });
        Ok(self)
    }

    /// Undoes [`Self::init`]: removes the error handler if it is still ours,
    /// deletes every wrapper and puts the saved originals back. Calling it
    /// without an active session does nothing.
    pub fn restore(&self) -> &Self {
        let Some(state) = self.state.lock().take() else {
            return self;
        };

        let mut error_handler = state.error_handler;
        error_hook::apply(self, &Configuration::teardown(), None, &mut error_handler);

        for level in state.config.levels().iter() {
            self.remove(level);
        }
        if !state.config.levels().contains(LOG_SLOT) {
            self.remove(LOG_SLOT);
        }
        for (name, original) in state.originals {
            self.set(name, original);
        }

        debug!(target: "console_relay", "console interception restored");
        self
    }

    /// Eager precondition check: fails when no transport can be provided.
    pub fn check_dependencies(&self) -> Result<&Self, RelayError> {
        self.resolve_transport()?;
        Ok(self)
    }

    /// Normalises `raw`, printing the missing-URL diagnostic through the
    /// current `log` slot.
    pub fn read_config(&self, raw: &RawConfig) -> Configuration {
        Configuration::normalize(raw, |line| {
            if let Some(log) = self.get(LOG_SLOT) {
                isolate(|| log(&[LogArg::from(line)]));
            }
        })
    }

    /// Configuration of the active session.
    pub fn config(&self) -> Option<Arc<Configuration>> {
        self.state
            .lock()
            .as_ref()
            .map(|state| Arc::clone(&state.config))
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_some()
    }

    /// Original function saved for `name` in the active session.
    pub fn original(&self, name: &str) -> Option<super::LogFn> {
        self.state
            .lock()
            .as_ref()
            .and_then(|state| state.originals.get(name).cloned())
    }

    fn resolve_transport(&self) -> Result<Arc<dyn Transport>, RelayError> {
        if let Some(transport) = self.transport() {
            transport
                .check_available()
                .map_err(|e| RelayError::MissingDependency(e.to_string()))?;
            return Ok(transport);
        }

        let transport: Arc<dyn Transport> = Arc::new(
            HttpTransport::new(TransportConfig::default())
                .map_err(|e| RelayError::MissingDependency(e.to_string()))?,
        );
        self.set_transport(Arc::clone(&transport));
        Ok(transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;
    use serde_json::json;
    use tracing_test::traced_test;

    fn console() -> Console {
        Console::new().with_transport(Arc::new(RecordingTransport::new()))
    }

    #[test]
    #[traced_test]
    fn test_init_and_restore_are_logged() {
        let console = console();
        console.init(json!({ "serverUrl": "/logs" })).unwrap();
        assert!(logs_contain("console interception started"));

        console.restore();
        assert!(logs_contain("console interception restored"));
    }

    #[test]
    fn test_read_config_diagnostic_uses_log_slot() {
        let lines = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let console = console();
        let sink = Arc::clone(&lines);
        console.set(
            LOG_SLOT,
            Arc::new(move |args: &[LogArg]| {
                sink.lock().push(crate::domain::join_args(args));
                serde_json::Value::Null
            }),
        );

        let config = console.read_config(&RawConfig::new());
        assert_eq!(config.server_url(), "");
        assert_eq!(*lines.lock(), [crate::config::MISSING_SERVER_URL]);
    }

    #[test]
    fn test_read_config_without_log_slot_is_silent() {
        let config = console().read_config(&RawConfig::new());
        assert_eq!(config, Configuration::default());
    }
}
