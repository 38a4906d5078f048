use serde::{Deserialize, Serialize};
use std::fmt;

/// Event body posted by `console-relay`. Every field is optional on the wire.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub stack_trace: Option<String>,
}

/// Console levels the collector knows how to re-emit.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Log,
    Info,
    Warn,
    Error,
}

impl Severity {
    /// Maps a console level name; `None` for names with no console function.
    pub fn from_level(level: &str) -> Option<Self> {
        match level {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "log" => Some(Self::Log),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder for a request header the client did not send.
pub const MISSING_HEADER: &str = "-";

/// Request context printed ahead of the event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Origin {
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

impl IncomingEvent {
    pub fn severity(&self) -> Option<Severity> {
        self.level.as_deref().and_then(Severity::from_level)
    }

    /// `[<referer>] <user-agent>`, then the message and the stack trace on
    /// their own lines when present.
    pub fn render(&self, origin: &Origin) -> String {
        let mut text = format!(
            "[{}] {}\n",
            origin.referer.as_deref().unwrap_or(MISSING_HEADER),
            origin.user_agent.as_deref().unwrap_or(MISSING_HEADER),
        );
        for part in [&self.message, &self.stack_trace].into_iter().flatten() {
            if !part.is_empty() {
                text.push_str(part);
                text.push('\n');
            }
        }
        text
    }
}
