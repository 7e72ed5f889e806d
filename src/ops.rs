//! Operators: functions from one [`Observable`](crate::observable::Observable)
//! to another.
//!
//! Every operator is an inherent method taking the source by value and
//! returning a new observable. Subscribing to the result subscribes to the
//! source with a forwarding observer; unsubscribing downstream cancels the
//! upstream work.
//!
//! Operators on nested streams (`merge_all`, `concat_all`, `switch_all`,
//! `exhaust_all`) are defined on `Observable<Observable<Item, Err>, Err>`.

/// Implements the `error`, `complete` and `is_closed` parts of an observer
/// that forwards them untouched to the downstream subscriber in `$field`.
macro_rules! forward_terminals {
  ($field:ident, $err:ty) => {
    #[inline]
    fn error(&mut self, err: $err) { self.$field.error(err) }

    #[inline]
    fn complete(&mut self) { self.$field.complete() }

    #[inline]
    fn is_closed(&self) -> bool { self.$field.is_closed() }
  };
}

pub mod catch_error;
pub mod debounce;
pub mod delay;
pub mod exhaust_all;
pub mod filter;
pub mod finalize;
pub mod map;
pub mod merge_all;
pub mod repeat;
pub mod retry;
pub mod retry_when;
pub mod scan;
pub mod share;
pub mod skip;
pub mod start_with;
pub mod switch_all;
pub mod take;
pub mod take_until;
pub mod tap;
pub mod throttle_time;

pub use retry::{RetryConfig, RetryPolicy};
pub use throttle_time::ThrottleEdge;
