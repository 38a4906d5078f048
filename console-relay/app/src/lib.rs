#![warn(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_possible_truncation, // Response times in millis fit in u64
    clippy::missing_errors_doc,       // Internal API
    clippy::missing_panics_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. TransportError in sender module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown              // Internal API
)]

pub mod app;
pub mod config;
pub mod console;
pub mod domain;
pub mod sender;
pub mod stack_trace;
pub mod test_support;

// Re-export main types for easy access
pub use config::{Configuration, RawConfig};
pub use console::{Console, ErrorHandler, LogFn, UncaughtError, console, install_panic_bridge};
pub use domain::{ErrorValue, LevelSet, LogArg, LogEvent, RelayError};
pub use sender::{HttpTransport, Transport, TransportConfig};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
