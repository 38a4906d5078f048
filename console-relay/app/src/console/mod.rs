//! The console facility: named level slots, the uncaught-error slot and the
//! interception session that wraps them.

mod error_hook;
mod lifecycle;
mod panic_bridge;
mod proxy;
mod session;

pub use panic_bridge::install_panic_bridge;
pub use proxy::{LOG_SLOT, OriginalFunctions, is_isolating};
pub(crate) use proxy::isolate;

use crate::domain::{LogArg, join_args};
use crate::sender::Transport;
use crate::stack_trace::{BacktraceExtractor, TraceExtractor};
use lifecycle::InterceptionState;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// A console level function. `Value::Null` stands for "no return value".
pub type LogFn = Arc<dyn Fn(&[LogArg]) -> Value + Send + Sync>;

/// Handler occupying the uncaught-error slot. Returns `true` when it
/// forwarded the error.
pub type ErrorHandler = Arc<dyn Fn(&UncaughtError) -> bool + Send + Sync>;

/// An error that escaped to the top of the program.
#[derive(Debug, Clone)]
pub struct UncaughtError {
    pub message: String,
    pub file_name: String,
    pub line_number: u32,
    pub column_number: u32,
    pub error: Option<LogArg>,
}

impl UncaughtError {
    pub fn new(
        message: impl Into<String>,
        file_name: impl Into<String>,
        line_number: u32,
        column_number: u32,
    ) -> Self {
        Self {
            message: message.into(),
            file_name: file_name.into(),
            line_number,
            column_number,
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<LogArg>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// `'<message>' <file>:<line>:<column>`, followed by the error's own text
    /// when there is one.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "'{}' {}:{}:{}",
            self.message, self.file_name, self.line_number, self.column_number
        );
        if let Some(error) = &self.error {
            text.push(' ');
            text.push_str(&error.to_string());
        }
        text
    }
}

/// A no-op level function.
pub fn noop() -> LogFn {
    Arc::new(|_: &[LogArg]| Value::Null)
}

/// The process-wide console with the default tracing-backed slots.
pub fn console() -> &'static Console {
    static CONSOLE: LazyLock<Console> = LazyLock::new(Console::with_tracing_sinks);
    &CONSOLE
}

/// A shared console facility.
///
/// Slots are looked up by name and cloned out of the lock before they are
/// called, so a level function may itself log through the console.
pub struct Console {
    slots: RwLock<HashMap<String, LogFn>>,
    error_handler: RwLock<Option<ErrorHandler>>,
    state: Mutex<Option<InterceptionState>>,
    transport: RwLock<Option<Arc<dyn Transport>>>,
    extractor: RwLock<Option<Arc<dyn TraceExtractor>>>,
}

impl Console {
    /// An empty console: no slots, no error handler.
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            error_handler: RwLock::new(None),
            state: Mutex::new(None),
            transport: RwLock::new(None),
            extractor: RwLock::new(Some(Arc::new(BacktraceExtractor))),
        }
    }

    /// A console whose `log`, `debug`, `info`, `warn` and `error` slots write
    /// to `tracing` under the `console` target.
    pub fn with_tracing_sinks() -> Self {
        let console = Self::new();
        for name in ["log", "debug", "info", "warn", "error"] {
            console.set(name, tracing_sink(name));
        }
        console
    }

    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        self.set_transport(transport);
        self
    }

    /// Transport used by sessions started after this call.
    pub fn set_transport(&self, transport: Arc<dyn Transport>) -> &Self {
        *self.transport.write() = Some(transport);
        self
    }

    /// Stack-trace capability used by sessions started after this call;
    /// `None` disables trace capture.
    pub fn set_trace_extractor(&self, extractor: Option<Arc<dyn TraceExtractor>>) -> &Self {
        *self.extractor.write() = extractor;
        self
    }

    pub fn get(&self, name: &str) -> Option<LogFn> {
        self.slots.read().get(name).cloned()
    }

    /// Replaces the slot `name`, returning what was there.
    pub fn set(&self, name: impl Into<String>, function: LogFn) -> Option<LogFn> {
        self.slots.write().insert(name.into(), function)
    }

    pub fn remove(&self, name: &str) -> Option<LogFn> {
        self.slots.write().remove(name)
    }

    /// Slot names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Calls the slot `name`; `None` when no such slot exists.
    pub fn call(&self, name: &str, args: &[LogArg]) -> Option<Value> {
        let function = self.get(name)?;
        Some(function(args))
    }

    pub fn log(&self, args: &[LogArg]) -> Value {
        self.call(LOG_SLOT, args).unwrap_or(Value::Null)
    }

    pub fn debug(&self, args: &[LogArg]) -> Value {
        self.call("debug", args).unwrap_or(Value::Null)
    }

    pub fn info(&self, args: &[LogArg]) -> Value {
        self.call("info", args).unwrap_or(Value::Null)
    }

    pub fn warn(&self, args: &[LogArg]) -> Value {
        self.call("warn", args).unwrap_or(Value::Null)
    }

    pub fn error(&self, args: &[LogArg]) -> Value {
        self.call("error", args).unwrap_or(Value::Null)
    }

    pub fn error_handler(&self) -> Option<ErrorHandler> {
        self.error_handler.read().clone()
    }

    /// Replaces the uncaught-error handler, returning the previous one.
    pub fn set_error_handler(&self, handler: Option<ErrorHandler>) -> Option<ErrorHandler> {
        std::mem::replace(&mut *self.error_handler.write(), handler)
    }

    /// Clears the uncaught-error slot only if it still holds `expected`.
    pub(crate) fn clear_error_handler_if(&self, expected: &ErrorHandler) -> bool {
        let mut slot = self.error_handler.write();
        match slot.as_ref() {
            Some(current) if Arc::ptr_eq(current, expected) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Hands `error` to the active uncaught-error handler. `false` when the
    /// slot is empty.
    pub fn raise_uncaught(&self, error: &UncaughtError) -> bool {
        match self.error_handler() {
            Some(handler) => handler(error),
            None => false,
        }
    }

    fn transport(&self) -> Option<Arc<dyn Transport>> {
        self.transport.read().clone()
    }

    fn trace_extractor(&self) -> Option<Arc<dyn TraceExtractor>> {
        self.extractor.read().clone()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("slots", &self.names())
            .field("error_handler", &self.error_handler.read().is_some())
            .field("active", &self.is_active())
            .finish()
    }
}

fn tracing_sink(name: &'static str) -> LogFn {
    Arc::new(move |args: &[LogArg]| {
        let line = join_args(args);
        match name {
            "error" => tracing::error!(target: "console", "{line}"),
            "warn" => tracing::warn!(target: "console", "{line}"),
            "debug" => tracing::debug!(target: "console", "{line}"),
            _ => tracing::info!(target: "console", "{line}"),
        }
        Value::Null
    })
}

/// Builds a `[LogArg; N]` from heterogeneous values.
///
/// ```
/// use console_relay::{Console, log_args};
///
/// let console = Console::with_tracing_sinks();
/// console.warn(&log_args!["retrying", 3]);
/// ```
#[macro_export]
macro_rules! log_args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::domain::LogArg::from($arg)),*]
    };
}
