use serde::{Deserialize, Serialize};

/// A single console call as reported to the collector.
///
/// Serialized as `{"level", "message", "stackTrace"?}` in that key order; the
/// trace key is omitted entirely when no trace was captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    pub level: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

impl LogEvent {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
            stack_trace: None,
        }
    }
}
