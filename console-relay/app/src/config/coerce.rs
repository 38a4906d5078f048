use serde_json::Value;

/// Text form of a loosely typed value, trimmed. Absent and `null` become "".
pub(super) fn trim_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Booleans pass through, the text "false" is false, anything else is true.
pub(super) fn flag_unless_false(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        other => trim_text(Some(other)) != "false",
    }
}

/// `true` for the boolean `true` or the text "true".
pub(super) fn is_true(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        other => trim_text(Some(other)) == "true",
    }
}
