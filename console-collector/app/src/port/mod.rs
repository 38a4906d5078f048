use crate::domain::Severity;

/// Destination for rendered console events.
pub trait EventSink: Send + Sync {
    fn emit(&self, severity: Severity, text: &str);
}

/// Re-emits events through `tracing` under the `console` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, severity: Severity, text: &str) {
        match severity {
            Severity::Trace => tracing::trace!(target: "console", "{text}"),
            Severity::Debug => tracing::debug!(target: "console", "{text}"),
            Severity::Log | Severity::Info => tracing::info!(target: "console", "{text}"),
            Severity::Warn => tracing::warn!(target: "console", "{text}"),
            Severity::Error => tracing::error!(target: "console", "{text}"),
        }
    }
}
