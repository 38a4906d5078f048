//! Outbound side of the relay: the [`Transport`] capability and the
//! [`Forwarder`] that decides whether an event goes out at all.

pub mod http;

pub use http::{HttpTransport, TransportConfig, TransportStats};

use crate::config::Configuration;
use crate::domain::LogEvent;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace};

#[cfg(test)]
use mockall::automock;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Missing runtime: {0}")]
    MissingRuntime(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Delivery capability used by the send path.
///
/// `dispatch` only requests delivery; it returns as soon as the request has
/// been handed off and never reports on the outcome.
#[cfg_attr(test, automock)]
pub trait Transport: Send + Sync {
    fn dispatch(&self, url: &str, event: &LogEvent) -> Result<(), TransportError>;

    /// Eager capability check performed once when a session starts.
    fn check_available(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Send path of one interception session.
pub struct Forwarder {
    config: Arc<Configuration>,
    transport: Arc<dyn Transport>,
}

impl Forwarder {
    pub fn new(config: Arc<Configuration>, transport: Arc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// `true` when `event` would be handed to the transport.
    ///
    /// Requires a server URL, a non-empty message and a level at or above
    /// `levelEnabledOnServer`.
    pub fn should_forward(&self, event: &LogEvent) -> bool {
        !self.config.server_url().is_empty()
            && !event.message.is_empty()
            && self.config.is_enabled_on_server(&event.level)
    }

    /// Hands `event` to the transport if it passes [`Self::should_forward`].
    /// Transport failures are logged and discarded.
    pub fn send(&self, event: &LogEvent) -> bool {
        if !self.should_forward(event) {
            trace!(target: "console_relay", level = %event.level, "event not forwarded");
            return false;
        }

        match self.transport.dispatch(self.config.server_url(), event) {
            Ok(()) => true,
            Err(e) => {
                debug!(target: "console_relay", "dropped console event: {e}");
                false
            }
        }
    }
}
