//! In-memory [`Transport`] for exercising the console without a network.

use crate::domain::LogEvent;
use crate::sender::{Transport, TransportError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Records every dispatched event together with the URL it was sent to.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, LogEvent)>>,
    failing: AtomicBool,
    unavailable: AtomicBool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later dispatch fail without recording.
    pub fn fail_dispatches(&self, failing: bool) -> &Self {
        self.failing.store(failing, Ordering::SeqCst);
        self
    }

    /// Makes the capability check fail, as if no transport were present.
    pub fn set_unavailable(&self, unavailable: bool) -> &Self {
        self.unavailable.store(unavailable, Ordering::SeqCst);
        self
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.sent.lock().iter().map(|(_, event)| event.clone()).collect()
    }

    pub fn sent(&self) -> Vec<(String, LogEvent)> {
        self.sent.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

impl Transport for RecordingTransport {
    fn dispatch(&self, url: &str, event: &LogEvent) -> Result<(), TransportError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(TransportError::InvalidUrl {
                url: url.to_string(),
                reason: "recording transport set to fail".to_string(),
            });
        }
        self.sent.lock().push((url.to_string(), event.clone()));
        Ok(())
    }

    fn check_available(&self) -> Result<(), TransportError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(TransportError::MissingRuntime(
                "recording transport marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}
