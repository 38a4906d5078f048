use super::AppError;
use super::cli::LogLevel;
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Dependencies that are too chatty at the relay's own level.
const DEFAULT_DIRECTIVES: &[(&str, LogLevel)] = &[
    ("hyper", LogLevel::Warn),
    ("hyper_util", LogLevel::Warn),
    ("reqwest", LogLevel::Warn),
    ("h2", LogLevel::Warn),
    ("rustls", LogLevel::Warn),
];

/// Filter used when `RUST_LOG` is not set: the default level first, then one
/// directive per noisy dependency.
pub fn build_filter_string(default_level: LogLevel) -> String {
    let mut filter_parts = Vec::with_capacity(DEFAULT_DIRECTIVES.len() + 1);
    filter_parts.push(default_level.as_str().to_string());
    for (target, level) in DEFAULT_DIRECTIVES {
        filter_parts.push(format!("{target}={}", level.as_str()));
    }
    filter_parts.join(",")
}

/// Installs the global subscriber once. Later calls are no-ops.
///
/// Output goes to stderr so stdin/stdout stay free for the relayed stream.
/// `RUST_LOG_FORMAT=json` switches to JSON lines.
pub fn setup_logging(default_level: LogLevel) -> Result<(), AppError> {
    static INIT: Once = Once::new();

    let mut result = Ok(());
    INIT.call_once(|| {
        result = init_subscriber(default_level);
    });
    result
}

fn init_subscriber(default_level: LogLevel) -> Result<(), AppError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let filter_string = build_filter_string(default_level);
            EnvFilter::try_new(&filter_string).map_err(|e| {
                AppError::Logging(format!("Failed to create EnvFilter with '{filter_string}': {e}"))
            })?
        }
    };

    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if use_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| AppError::Logging(format!("Failed to set global tracing subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_string_starts_with_default_level() {
        let filter = build_filter_string(LogLevel::Debug);
        assert!(filter.starts_with("debug,"));
        assert!(filter.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
