use super::proxy::is_isolating;
use super::{Console, UncaughtError};
use crate::domain::ErrorValue;
use std::backtrace::Backtrace;
use std::panic::{self, PanicHookInfo};
use std::sync::Once;

static BRIDGE: Once = Once::new();

/// Routes panics to `console`'s uncaught-error slot, ahead of the panic hook
/// that was installed before. Only the first call has an effect.
///
/// Panics raised inside a proxied level function are left to that wrapper.
pub fn install_panic_bridge(console: &'static Console) {
    BRIDGE.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !is_isolating() {
                console.raise_uncaught(&uncaught_from_panic(info));
            }
            previous(info);
        }));
    });
}

fn uncaught_from_panic(info: &PanicHookInfo<'_>) -> UncaughtError {
    let payload = info.payload();
    let message = if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unspecified panic".to_string()
    };

    let (file, line, column) = info
        .location()
        .map(|loc| (loc.file().to_string(), loc.line(), loc.column()))
        .unwrap_or_else(|| ("<unknown>".to_string(), 0, 0));

    let error = ErrorValue::from_message(format!("panic: {message}"))
        .with_backtrace(Backtrace::capture());
    UncaughtError::new(message, file, line, column).with_error(error)
}
