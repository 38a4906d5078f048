//! Installs the process-wide subscriber, so it lives in its own test binary.

use console_relay::app::{LogLevel, setup_logging};
use console_relay::{Console, log_args};

#[test]
fn test_setup_logging_is_idempotent() {
    assert!(setup_logging(LogLevel::Debug).is_ok());
    assert!(setup_logging(LogLevel::Info).is_ok());

    // The default console slots write through the installed subscriber.
    let console = Console::with_tracing_sinks();
    console.info(&log_args!["subscriber installed"]);
}
