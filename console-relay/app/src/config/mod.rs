//! Configuration input and normalisation.
//!
//! [`RawConfig`] mirrors the loosely typed object a caller hands to
//! `Console::init`; [`Configuration::normalize`] turns it into the canonical
//! form. Normalisation never fails: anything missing or invalid falls back to
//! a documented default.

mod coerce;
mod sources;

use crate::domain::LevelSet;
use crate::domain::level_set::DEFAULT_LEVELS;
use serde_json::{Map, Value};
use thiserror::Error;

pub use sources::ENV_PREFIX;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Line emitted when no collector URL is configured.
pub const MISSING_SERVER_URL: &str = "No server URL specified (serverUrl)";

/// Loosely typed configuration, one optional JSON value per recognised key.
///
/// Canonical keys are `levels`, `levelEnabledOnServer`, `levelForConsoleLog`,
/// `levelForErrors`, `serverUrl` and `logErrors`. Older spellings are accepted
/// on input: `levelForJavaScriptErrors` / `levelForGlobalErrors`, and the
/// inverted `disableJavaScriptErrorsLogging` / `disableOnErrorHandler`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    pub levels: Option<Value>,
    pub level_enabled_on_server: Option<Value>,
    pub level_for_console_log: Option<Value>,
    pub level_for_errors: Option<Value>,
    pub server_url: Option<Value>,
    pub log_errors: Option<Value>,
    pub disable_errors_logging: Option<Value>,
}

const LEVEL_FOR_ERRORS_KEYS: [&str; 3] = [
    "levelForErrors",
    "levelForJavaScriptErrors",
    "levelForGlobalErrors",
];
const DISABLE_ERRORS_KEYS: [&str; 2] = ["disableJavaScriptErrorsLogging", "disableOnErrorHandler"];

impl RawConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the recognised keys out of a JSON object. Anything that is not an
    /// object yields an empty configuration.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let first_of = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| map.get(*key).filter(|value| !value.is_null()))
                .cloned()
        };

        Self {
            levels: first_of(&["levels"]),
            level_enabled_on_server: first_of(&["levelEnabledOnServer"]),
            level_for_console_log: first_of(&["levelForConsoleLog"]),
            level_for_errors: first_of(&LEVEL_FOR_ERRORS_KEYS),
            server_url: first_of(&["serverUrl"]),
            log_errors: first_of(&["logErrors"]),
            disable_errors_logging: first_of(&DISABLE_ERRORS_KEYS),
        }
    }

    pub fn levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = Some(Value::Array(
            levels.into_iter().map(|level| Value::String(level.into())).collect(),
        ));
        self
    }

    pub fn level_enabled_on_server(mut self, level: impl Into<String>) -> Self {
        self.level_enabled_on_server = Some(Value::String(level.into()));
        self
    }

    pub fn level_for_console_log(mut self, level: impl Into<String>) -> Self {
        self.level_for_console_log = Some(Value::String(level.into()));
        self
    }

    pub fn level_for_errors(mut self, level: impl Into<String>) -> Self {
        self.level_for_errors = Some(Value::String(level.into()));
        self
    }

    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(Value::String(url.into()));
        self
    }

    pub fn log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = Some(Value::Bool(enabled));
        self
    }

    /// Fills every key that is unset here from `other`.
    pub fn or(self, other: RawConfig) -> Self {
        Self {
            levels: self.levels.or(other.levels),
            level_enabled_on_server: self
                .level_enabled_on_server
                .or(other.level_enabled_on_server),
            level_for_console_log: self.level_for_console_log.or(other.level_for_console_log),
            level_for_errors: self.level_for_errors.or(other.level_for_errors),
            server_url: self.server_url.or(other.server_url),
            log_errors: self.log_errors.or(other.log_errors),
            disable_errors_logging: self.disable_errors_logging.or(other.disable_errors_logging),
        }
    }
}

impl From<Value> for RawConfig {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

impl From<&Value> for RawConfig {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<Option<Value>> for RawConfig {
    fn from(value: Option<Value>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

/// Canonical configuration. Every `level_*` selector is a member of `levels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    levels: LevelSet,
    level_enabled_on_server: String,
    level_for_console_log: String,
    level_for_errors: String,
    server_url: String,
    log_errors: bool,
}

impl Configuration {
    /// Normalises `raw`. When the server URL ends up empty, one line is handed
    /// to `diagnostic`.
    pub fn normalize<F>(raw: &RawConfig, diagnostic: F) -> Self
    where
        F: FnOnce(&str),
    {
        let levels = normalize_levels(raw.levels.as_ref());

        let level_enabled_on_server =
            select_level(raw.level_enabled_on_server.as_ref(), &levels, levels.first());
        let level_for_console_log =
            select_level(raw.level_for_console_log.as_ref(), &levels, levels.first());
        let level_for_errors = select_level(raw.level_for_errors.as_ref(), &levels, levels.last());

        let server_url = coerce::trim_text(raw.server_url.as_ref());
        if server_url.is_empty() {
            diagnostic(MISSING_SERVER_URL);
        }

        let log_errors = match raw.log_errors.as_ref() {
            Some(value) => coerce::flag_unless_false(value),
            None => !raw
                .disable_errors_logging
                .as_ref()
                .is_some_and(coerce::is_true),
        };

        Self {
            levels,
            level_enabled_on_server,
            level_for_console_log,
            level_for_errors,
            server_url,
            log_errors,
        }
    }

    /// Configuration applied while tearing a session down: no error hook, and
    /// a placeholder URL so that no diagnostic is printed.
    pub fn teardown() -> Self {
        let raw = RawConfig::new()
            .levels(Vec::<String>::new())
            .server_url("-")
            .log_errors(false);
        Self::normalize(&raw, |_| {})
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn level_enabled_on_server(&self) -> &str {
        &self.level_enabled_on_server
    }

    pub fn level_for_console_log(&self) -> &str {
        &self.level_for_console_log
    }

    pub fn level_for_errors(&self) -> &str {
        &self.level_for_errors
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn log_errors(&self) -> bool {
        self.log_errors
    }

    /// `true` when an event at `level` passes the server threshold.
    pub fn is_enabled_on_server(&self, level: &str) -> bool {
        self.levels.is_at_least(level, &self.level_enabled_on_server)
    }
}

fn normalize_levels(raw: Option<&Value>) -> LevelSet {
    let Some(Value::Array(entries)) = raw else {
        return LevelSet::default();
    };

    let names = entries
        .iter()
        .map(|entry| coerce::trim_text(Some(entry)))
        .filter(|name| !name.is_empty())
        .collect();

    LevelSet::new(names).unwrap_or_default()
}

fn select_level(raw: Option<&Value>, levels: &LevelSet, fallback: &str) -> String {
    let candidate = coerce::trim_text(raw);
    if levels.contains(&candidate) {
        candidate
    } else {
        fallback.to_string()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        let levels = LevelSet::default();
        Self {
            level_enabled_on_server: DEFAULT_LEVELS[0].to_string(),
            level_for_console_log: DEFAULT_LEVELS[0].to_string(),
            level_for_errors: DEFAULT_LEVELS[DEFAULT_LEVELS.len() - 1].to_string(),
            levels,
            server_url: String::new(),
            log_errors: true,
        }
    }
}
