//! Best-effort stack traces for error-like console arguments.
//!
//! Extraction sits behind [`TraceExtractor`]; the rest of the relay only sees
//! the tri-state [`TraceProbe`] and never branches on argument types itself.

use crate::console::isolate;
use crate::domain::log_arg::split_frames;
use crate::domain::{ErrorValue, LogArg, LogEvent};
use std::backtrace::BacktraceStatus;
use thiserror::Error;
use tracing::trace;

#[cfg(test)]
use mockall::automock;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("No trace recorded for this error")]
    Unavailable,
    #[error("Trace extraction failed: {0}")]
    Extraction(String),
}

/// Capability that turns an error-like value into stack frames.
#[cfg_attr(test, automock)]
pub trait TraceExtractor: Send + Sync {
    fn frames(&self, error: &ErrorValue) -> Result<Vec<String>, TraceError>;
}

/// Reads explicit frames first, then a captured `std::backtrace::Backtrace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceExtractor;

impl TraceExtractor for BacktraceExtractor {
    fn frames(&self, error: &ErrorValue) -> Result<Vec<String>, TraceError> {
        if let Some(frames) = error.frames() {
            return Ok(frames.to_vec());
        }
        match error.backtrace() {
            Some(backtrace) if backtrace.status() == BacktraceStatus::Captured => {
                Ok(split_frames(&backtrace.to_string()))
            }
            _ => Err(TraceError::Unavailable),
        }
    }
}

/// Outcome of probing one candidate value for a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceProbe {
    /// The candidate is not error-like, or no extractor is installed.
    Unsupported,
    /// Extraction was attempted and produced nothing usable.
    NoTrace,
    /// Frames joined with `\n`.
    Available(String),
}

/// Probes `candidate` once. Never panics, even if the extractor does.
pub fn probe(extractor: Option<&dyn TraceExtractor>, candidate: &LogArg) -> TraceProbe {
    let (Some(extractor), Some(error)) = (extractor, candidate.as_error()) else {
        return TraceProbe::Unsupported;
    };

    match isolate(|| extractor.frames(error)) {
        Some(Ok(frames)) if !frames.is_empty() => TraceProbe::Available(frames.join("\n")),
        Some(Ok(_)) => TraceProbe::NoTrace,
        Some(Err(e)) => {
            trace!(target: "console_relay", "no stack trace: {e}");
            TraceProbe::NoTrace
        }
        None => {
            trace!(target: "console_relay", "stack trace extractor panicked");
            TraceProbe::NoTrace
        }
    }
}

/// Sets `event.stack_trace` from `candidate`, or clears it when no trace could
/// be obtained, and hands the same event back.
pub fn annotate<'a>(
    event: &'a mut LogEvent,
    candidate: &LogArg,
    extractor: Option<&dyn TraceExtractor>,
) -> &'a mut LogEvent {
    event.stack_trace = match probe(extractor, candidate) {
        TraceProbe::Available(trace) => Some(trace),
        TraceProbe::Unsupported | TraceProbe::NoTrace => None,
    };
    event
}

/// Attaches the trace of the first argument that yields one; later arguments
/// are not inspected.
pub fn annotate_first(
    event: &mut LogEvent,
    args: &[LogArg],
    extractor: Option<&dyn TraceExtractor>,
) -> bool {
    for arg in args {
        if annotate(event, arg, extractor).stack_trace.is_some() {
            return true;
        }
    }
    false
}
