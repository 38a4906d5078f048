use thiserror::Error;

/// Top-level error type for the relay.
///
/// Logging through a proxied console never produces one of these; they only
/// surface from the explicit lifecycle entry points.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing dependency: {0}")]
    MissingDependency(String),
}
