use super::proxy::isolate;
use super::session::Session;
use super::{Console, ErrorHandler, UncaughtError};
use crate::config::Configuration;
use crate::domain::LogArg;
use std::sync::Arc;

/// Line logged when a foreign uncaught-error handler is about to be replaced.
pub(crate) const OVERRIDE_WARNING: &str =
    "uncaught error handler will be overridden; set logErrors to false to prevent this";

/// Moves the uncaught-error slot to the state `config` asks for.
///
/// `installed` is the handler this session put in place, if any. The slot is
/// only ever cleared while it still holds that exact handler.
pub(crate) fn apply(
    console: &Console,
    config: &Configuration,
    session: Option<&Arc<Session>>,
    installed: &mut Option<ErrorHandler>,
) {
    if !config.log_errors() {
        if let Some(mine) = installed.take() {
            console.clear_error_handler_if(&mine);
        }
        return;
    }

    let Some(session) = session else {
        return;
    };

    if let Some(active) = console.error_handler() {
        let is_mine = installed
            .as_ref()
            .is_some_and(|mine| Arc::ptr_eq(mine, &active));
        if !is_mine {
            console.log(&[LogArg::from(OVERRIDE_WARNING)]);
        }
    }

    let session = Arc::clone(session);
    let handler: ErrorHandler = Arc::new(move |error: &UncaughtError| {
        isolate(|| session.report_uncaught(error)).unwrap_or(false)
    });
    console.set_error_handler(Some(Arc::clone(&handler)));
    *installed = Some(handler);
}
