//! Shared test support utilities

use crate::domain::Severity;
use crate::port::EventSink;
use std::sync::Mutex;

/// Sink that keeps every emitted event for later inspection.
#[derive(Debug, Default)]
pub struct CapturingSink {
    events: Mutex<Vec<(Severity, String)>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Severity, String)> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl EventSink for CapturingSink {
    fn emit(&self, severity: Severity, text: &str) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push((severity, text.to_string()));
    }
}
