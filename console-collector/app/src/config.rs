use std::env;

use crate::error::CollectorError;

/// Port the collector listens on when `HTTP_PORT` is unset.
pub const DEFAULT_HTTP_PORT: u16 = 1337;
/// Route that receives console events when `LOGS_PATH` is unset.
pub const DEFAULT_LOGS_PATH: &str = "/logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// HTTP server port (logs + health)
    pub http_port: u16,
    /// Route accepting `POST`ed console events
    pub logs_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            logs_path: DEFAULT_LOGS_PATH.to_string(),
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), CollectorError> {
        validate_port(self.http_port)?;
        validate_path(&self.logs_path)?;
        Ok(())
    }
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), CollectorError> {
    if port == 0 {
        return Err(CollectorError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

/// Validates that the route is absolute, literal, and does not clash with the
/// health endpoint. Captures and wildcards would make the router panic.
fn validate_path(path: &str) -> Result<(), CollectorError> {
    if !path.starts_with('/') || path.len() < 2 {
        return Err(CollectorError::Config(format!(
            "Logs path must start with '/' and name a route: {path:?}"
        )));
    }
    let non_literal = path.contains(['{', '}'])
        || path
            .split('/')
            .skip(1)
            .any(|segment| segment.is_empty() || segment.starts_with([':', '*']));
    if non_literal {
        return Err(CollectorError::Config(format!(
            "Logs path must be a literal route: {path:?}"
        )));
    }
    if path == crate::app::HEALTH_PATH {
        return Err(CollectorError::Config(format!(
            "Logs path cannot be the health endpoint {path}"
        )));
    }
    Ok(())
}

pub fn get_configuration() -> Result<Settings, CollectorError> {
    let http_port = match env::var("HTTP_PORT") {
        Ok(port) => port
            .trim()
            .parse::<u16>()
            .map_err(|e| CollectorError::Config(format!("Invalid HTTP_PORT {port:?}: {e}")))?,
        Err(_) => DEFAULT_HTTP_PORT,
    };
    let logs_path = env::var("LOGS_PATH")
        .map(|path| path.trim().to_string())
        .unwrap_or_else(|_| DEFAULT_LOGS_PATH.to_string());

    let settings = Settings {
        http_port,
        logs_path,
    };

    // Validate settings before returning
    settings.validate()?;

    Ok(settings)
}
