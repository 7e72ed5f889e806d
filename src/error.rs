//! Errors that are not stream notifications.
//!
//! Stream-level failures travel through the `error` channel of an
//! [`Observer`](crate::observer::Observer) and are typed by each observable's
//! `Err` parameter. The types here cover the two cases that must reach a caller
//! by other means: misuse of a lifecycle-bound object ([`UsageError`]) and a
//! stream error that arrived at a subscriber without an error handler
//! ([`report_unhandled`]).
use std::{cell::RefCell, fmt::Debug, rc::Rc};

use thiserror::Error;

/// Returned when an object is used after it was explicitly disposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
  #[error("object unsubscribed: the subject was disposed and accepts no more notifications or subscribers")]
  ObjectUnsubscribed,
}

type UnhandledHook = Rc<dyn Fn(&dyn Debug)>;

thread_local! {
  static UNHANDLED_HOOK: RefCell<Option<UnhandledHook>> = RefCell::new(None);
}

/// Installs the handler for stream errors that reached a subscriber which did
/// not supply an `error` callback, returning the previous one.
///
/// The hook is per thread. Without a hook such errors panic.
pub fn set_unhandled_error_hook<F>(hook: F) -> Option<Rc<dyn Fn(&dyn Debug)>>
where
  F: Fn(&dyn Debug) + 'static,
{
  UNHANDLED_HOOK.with(|h| h.borrow_mut().replace(Rc::new(hook)))
}

/// Removes the current thread's unhandled-error hook.
pub fn take_unhandled_error_hook() -> Option<Rc<dyn Fn(&dyn Debug)>> {
  UNHANDLED_HOOK.with(|h| h.borrow_mut().take())
}

/// Surfaces a stream error nobody handled.
///
/// # Panics
///
/// Panics with `unhandled stream error: ...` when no hook is installed.
pub fn report_unhandled<Err: Debug>(err: Err) {
  tracing::error!(error = ?err, "unhandled stream error");
  let hook = UNHANDLED_HOOK.with(|h| h.borrow().clone());
  match hook {
    Some(hook) => hook(&err),
    None => panic!("unhandled stream error: {err:?}"),
  }
}
