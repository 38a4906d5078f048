//! Domain layer for console-relay.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEvent`: The payload forwarded to the collector
//! - `LogArg` / `ErrorValue`: Arguments of a console call
//! - `LevelSet`: Ordered severity names (rank = position)
//! - `RelayError`: Top-level error type

pub mod error;
pub mod level_set;
pub mod log_arg;
pub mod log_event;

pub use error::RelayError;
pub use level_set::LevelSet;
pub use log_arg::{ErrorValue, LogArg, join_args};
pub use log_event::LogEvent;
