use super::session::Session;
use super::{Console, LogFn, noop};
use crate::config::Configuration;
use crate::domain::{LogArg, join_args};
use serde_json::Value;
use std::cell::Cell;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Name of the generic console entry point.
pub const LOG_SLOT: &str = "log";

/// Level functions that existed before interception, keyed by slot name.
pub type OriginalFunctions = HashMap<String, LogFn>;

thread_local! {
    static ISOLATION_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// `true` while the current thread is inside a wrapper's isolation boundary.
pub fn is_isolating() -> bool {
    ISOLATION_DEPTH.with(|depth| depth.get() > 0)
}

/// Runs `f`, turning a panic into `None`.
pub(crate) fn isolate<T>(f: impl FnOnce() -> T) -> Option<T> {
    ISOLATION_DEPTH.with(|depth| depth.set(depth.get() + 1));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    ISOLATION_DEPTH.with(|depth| depth.set(depth.get() - 1));
    result.ok()
}

/// Wraps every configured level of `console` and, when `log` is not itself a
/// level, points `log` at the wrapper for `levelForConsoleLog`.
///
/// `originals` carries functions saved earlier in the same session; a level
/// that already has a saved original is wrapped around that original again,
/// never around a wrapper.
pub(crate) fn install_proxies(
    console: &Console,
    config: &Configuration,
    session: &Arc<Session>,
    mut originals: OriginalFunctions,
) -> OriginalFunctions {
    if !originals.contains_key(LOG_SLOT)
        && let Some(log) = console.get(LOG_SLOT)
    {
        originals.insert(LOG_SLOT.to_string(), log);
    }
    let fallback = originals.get(LOG_SLOT).cloned().unwrap_or_else(noop);

    for level in config.levels().iter() {
        let original = match originals.get(level) {
            Some(saved) => saved.clone(),
            None => match console.get(level) {
                Some(current) => {
                    originals.insert(level.to_string(), current.clone());
                    current
                }
                None => fallback.clone(),
            },
        };
        console.set(level, wrap(level, original, Arc::clone(session)));
    }

    if !config.levels().contains(LOG_SLOT)
        && let Some(wrapper) = console.get(config.level_for_console_log())
    {
        console.set(LOG_SLOT, wrapper);
    }

    originals
}

fn wrap(level: &str, original: LogFn, session: Arc<Session>) -> LogFn {
    let level = level.to_string();
    Arc::new(move |args: &[LogArg]| {
        let mut returns = Value::Null;
        isolate(|| {
            let message = join_args(args);
            returns = original(args);
            session.report_call(&level, message, args);
        });
        returns
    })
}
