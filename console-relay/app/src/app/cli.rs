use crate::config::{ConfigError, RawConfig};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Relays stdin lines through an intercepted console.
///
/// Each line may start with `<level>:` to pick the console level; other lines
/// go through `log`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Collector endpoint that receives forwarded events
    #[arg(long, env = "CONSOLE_RELAY_SERVER_URL")]
    pub server_url: Option<String>,

    /// Base URL used to resolve a relative server URL
    #[arg(long, env = "CONSOLE_RELAY_BASE_URL")]
    pub base_url: Option<Url>,

    /// Severity levels, least severe first (comma separated)
    #[arg(long, env = "CONSOLE_RELAY_LEVELS", value_delimiter = ',')]
    pub levels: Vec<String>,

    /// Minimum level forwarded to the collector
    #[arg(long, env = "CONSOLE_RELAY_LEVEL_ENABLED_ON_SERVER")]
    pub level_enabled_on_server: Option<String>,

    /// Level that plain `log` calls are reported as
    #[arg(long, env = "CONSOLE_RELAY_LEVEL_FOR_CONSOLE_LOG")]
    pub level_for_console_log: Option<String>,

    /// Level used for uncaught errors and panics
    #[arg(long, env = "CONSOLE_RELAY_LEVEL_FOR_ERRORS")]
    pub level_for_errors: Option<String>,

    /// Leave the uncaught-error handler uninstalled
    #[arg(long, env = "CONSOLE_RELAY_NO_LOG_ERRORS")]
    pub no_log_errors: bool,

    /// TOML configuration file (optional); command line values win
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level of the relay's own diagnostics
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            base_url: None,
            levels: Vec::new(),
            level_enabled_on_server: None,
            level_for_console_log: None,
            level_for_errors: None,
            no_log_errors: false,
            config_file: None,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Config::try_parse_from(args)
    }

    /// Console configuration: command line values first, then `CONSOLE_RELAY_*`
    /// variables, then the config file.
    pub fn raw_config(&self) -> Result<RawConfig, ConfigError> {
        let mut cli = RawConfig::new();
        if !self.levels.is_empty() {
            cli = cli.levels(self.levels.iter().cloned());
        }
        if let Some(level) = &self.level_enabled_on_server {
            cli = cli.level_enabled_on_server(level);
        }
        if let Some(level) = &self.level_for_console_log {
            cli = cli.level_for_console_log(level);
        }
        if let Some(level) = &self.level_for_errors {
            cli = cli.level_for_errors(level);
        }
        if let Some(url) = &self.server_url {
            cli = cli.server_url(url);
        }
        if self.no_log_errors {
            cli = cli.log_errors(false);
        }

        let file = match &self.config_file {
            Some(path) => RawConfig::from_file(path)?,
            None => RawConfig::default(),
        };
        Ok(cli.or(RawConfig::from_env()).or(file))
    }
}
