use super::{ConfigError, RawConfig};
use serde_json::Value;
use std::path::Path;

/// Prefix shared by every environment variable read by [`RawConfig::from_env`].
pub const ENV_PREFIX: &str = "CONSOLE_RELAY_";

impl RawConfig {
    /// Parses a TOML document using the same keys as the JSON form.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let document: toml::Table = toml::from_str(content)?;
        let value = serde_json::to_value(document)
            .map_err(|e| ConfigError::InvalidConfig(format!("Unsupported TOML value: {e}")))?;
        Ok(Self::from_value(&value))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Reads the `CONSOLE_RELAY_*` variables the command line has no flag for.
    /// Only `CONSOLE_RELAY_LOG_ERRORS` qualifies; the others are clap `env`
    /// fallbacks on [`crate::app::Config`].
    pub fn from_env() -> Self {
        let mut config = Self::default();
        load_env_value("LOG_ERRORS", &mut config.log_errors);
        config
    }
}

/// Loads a prefixed environment variable as a JSON string.
/// Leaves `target` untouched if the variable doesn't exist.
fn load_env_value(suffix: &str, target: &mut Option<Value>) {
    if let Ok(value) = std::env::var(format!("{ENV_PREFIX}{suffix}")) {
        *target = Some(Value::String(value));
    }
}
