use console_relay::Configuration;
use console_relay::app::{Config, LogLevel};
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clean_all_env_vars() {
    let env_vars = [
        "CONSOLE_RELAY_SERVER_URL",
        "CONSOLE_RELAY_BASE_URL",
        "CONSOLE_RELAY_LEVELS",
        "CONSOLE_RELAY_LEVEL_ENABLED_ON_SERVER",
        "CONSOLE_RELAY_LEVEL_FOR_CONSOLE_LOG",
        "CONSOLE_RELAY_LEVEL_FOR_ERRORS",
        "CONSOLE_RELAY_LOG_ERRORS",
        "CONSOLE_RELAY_NO_LOG_ERRORS",
        "CONFIG_FILE",
        "LOG_LEVEL",
    ];

    unsafe {
        for var in &env_vars {
            env::remove_var(var);
        }
    }
}

#[test]
#[serial]
fn test_config_from_args() {
    clean_all_env_vars();
    let config = Config::from_args([
        "console-relay",
        "--server-url",
        "/logs",
        "--base-url",
        "http://localhost:1337",
        "--levels",
        "debug,info,warn,error",
        "--level-enabled-on-server",
        "warn",
        "--no-log-errors",
        "--log-level",
        "debug",
    ])
    .unwrap();

    assert_eq!(config.server_url.as_deref(), Some("/logs"));
    assert_eq!(
        config.base_url.as_ref().map(|u| u.as_str()),
        Some("http://localhost:1337/")
    );
    assert_eq!(config.levels, ["debug", "info", "warn", "error"]);
    assert_eq!(config.log_level, LogLevel::Debug);

    let normalized = Configuration::normalize(&config.raw_config().unwrap(), |_| {});
    assert_eq!(normalized.server_url(), "/logs");
    assert_eq!(normalized.level_enabled_on_server(), "warn");
    assert_eq!(normalized.level_for_console_log(), "debug");
    assert!(!normalized.log_errors());
}

#[test]
#[serial]
fn test_defaults_without_args() {
    clean_all_env_vars();
    let config = Config::from_args(["console-relay"]).unwrap();
    assert!(config.server_url.is_none());
    assert!(config.levels.is_empty());
    assert_eq!(config.log_level, LogLevel::Info);

    let normalized = Configuration::normalize(&config.raw_config().unwrap(), |_| {});
    assert_eq!(normalized, Configuration::default());
}

#[test]
#[serial]
fn test_cli_values_override_config_file() {
    clean_all_env_vars();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
serverUrl = "/from-file"
levelForErrors = "warn"
"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let config = Config::from_args([
        "console-relay",
        "--server-url",
        "/from-cli",
        "--config-file",
        path.as_str(),
    ])
    .unwrap();

    let normalized = Configuration::normalize(&config.raw_config().unwrap(), |_| {});
    assert_eq!(normalized.server_url(), "/from-cli");
    assert_eq!(normalized.level_for_errors(), "warn");
}

#[test]
#[serial]
fn test_env_fallback() {
    clean_all_env_vars();
    unsafe {
        env::set_var("CONSOLE_RELAY_SERVER_URL", "/from-env");
        env::set_var("CONSOLE_RELAY_LOG_ERRORS", "false");
        env::set_var("LOG_LEVEL", "warn");
    }

    let config = Config::from_args(["console-relay"]).unwrap();
    let normalized = Configuration::normalize(&config.raw_config().unwrap(), |_| {});
    clean_all_env_vars();

    assert_eq!(config.log_level, LogLevel::Warn);
    assert_eq!(normalized.server_url(), "/from-env");
    assert!(!normalized.log_errors());
}

#[test]
#[serial]
fn test_missing_config_file_is_an_error() {
    clean_all_env_vars();
    let config = Config::from_args([
        "console-relay",
        "--config-file",
        "/definitely/not/here.toml",
    ])
    .unwrap();
    assert!(config.raw_config().is_err());
}

#[test]
fn test_invalid_log_level_is_rejected() {
    assert!(Config::from_args(["console-relay", "--log-level", "loud"]).is_err());
}
