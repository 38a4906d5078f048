use serde_json::Value;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::sync::Arc;

/// Separator placed between arguments when a call is rendered as one message.
pub const ARG_SEPARATOR: &str = ", ";

/// One argument passed to a console level function.
#[derive(Debug, Clone)]
pub enum LogArg {
    Text(String),
    Value(Value),
    Error(ErrorValue),
}

impl LogArg {
    /// Wraps any error as an error-like argument without a trace.
    pub fn error<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::Error(ErrorValue::new(error))
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Value(Value::String(text)) => f.write_str(text),
            Self::Value(Value::Null) => f.write_str("null"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Error(error) => f.write_str(error.message()),
        }
    }
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&String> for LogArg {
    fn from(text: &String) -> Self {
        Self::Text(text.clone())
    }
}

impl From<Value> for LogArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<ErrorValue> for LogArg {
    fn from(error: ErrorValue) -> Self {
        Self::Error(error)
    }
}

impl From<anyhow::Error> for LogArg {
    fn from(error: anyhow::Error) -> Self {
        Self::Error(ErrorValue::from(error))
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i32, i64, u32, u64, usize, f64);

/// Renders a call's arguments the way they are forwarded: display text
/// joined with `", "`.
pub fn join_args(args: &[LogArg]) -> String {
    args.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ARG_SEPARATOR)
}

/// An error-shaped console argument: display text plus whatever trace
/// material was available when it was created.
#[derive(Debug, Clone)]
pub struct ErrorValue {
    message: String,
    trace: TraceMaterial,
}

#[derive(Debug, Clone)]
enum TraceMaterial {
    Absent,
    Backtrace(Arc<Backtrace>),
    Frames(Arc<[String]>),
}

impl ErrorValue {
    pub fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::from_message(error.to_string())
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: TraceMaterial::Absent,
        }
    }

    /// Wraps `error` and captures a backtrace at the call site.
    ///
    /// Whether frames are actually recorded follows `RUST_BACKTRACE` /
    /// `RUST_LIB_BACKTRACE`.
    pub fn capture<E>(error: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::new(error).with_backtrace(Backtrace::capture())
    }

    pub fn with_backtrace(mut self, backtrace: Backtrace) -> Self {
        self.trace = TraceMaterial::Backtrace(Arc::new(backtrace));
        self
    }

    pub fn with_frames<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trace = TraceMaterial::Frames(frames.into_iter().map(Into::into).collect());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        match &self.trace {
            TraceMaterial::Backtrace(backtrace) => Some(backtrace.as_ref()),
            _ => None,
        }
    }

    pub fn frames(&self) -> Option<&[String]> {
        match &self.trace {
            TraceMaterial::Frames(frames) => Some(frames.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<anyhow::Error> for ErrorValue {
    fn from(error: anyhow::Error) -> Self {
        let value = Self::from_message(format!("{error:#}"));
        let backtrace = error.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            value.with_frames(split_frames(&backtrace.to_string()))
        } else {
            value
        }
    }
}

/// Splits a rendered backtrace into one entry per non-blank line.
pub(crate) fn split_frames(rendered: &str) -> Vec<String> {
    rendered
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(String::from)
        .collect()
}
