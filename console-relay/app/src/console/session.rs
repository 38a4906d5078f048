use super::UncaughtError;
use crate::config::Configuration;
use crate::domain::{LogArg, LogEvent};
use crate::sender::{Forwarder, Transport};
use crate::stack_trace::{self, TraceExtractor};
use std::sync::Arc;

/// Everything a wrapper or the error handler needs while a session is active.
pub(crate) struct Session {
    forwarder: Forwarder,
    extractor: Option<Arc<dyn TraceExtractor>>,
}

impl Session {
    pub(crate) fn new(
        config: Arc<Configuration>,
        transport: Arc<dyn Transport>,
        extractor: Option<Arc<dyn TraceExtractor>>,
    ) -> Self {
        Self {
            forwarder: Forwarder::new(config, transport),
            extractor,
        }
    }

    pub(crate) fn config(&self) -> &Configuration {
        self.forwarder.config()
    }

    /// Builds the event for one intercepted call and hands it to the send path.
    pub(crate) fn report_call(&self, level: &str, message: String, args: &[LogArg]) -> bool {
        let mut event = LogEvent::new(level, message);
        stack_trace::annotate_first(&mut event, args, self.extractor.as_deref());
        self.forwarder.send(&event)
    }

    pub(crate) fn report_uncaught(&self, error: &UncaughtError) -> bool {
        let mut event = LogEvent::new(self.config().level_for_errors(), error.describe());
        if let Some(candidate) = &error.error {
            stack_trace::annotate(&mut event, candidate, self.extractor.as_deref());
        }
        self.forwarder.send(&event)
    }
}
