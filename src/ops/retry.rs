//! Resubscribing to a source after it failed.
//!
//! `retry(n)` allows `n` further attempts right away. [`retry_with`] takes a
//! [`RetryPolicy`], which decides per error whether to try again and how long
//! to wait first; the wait happens on the given scheduler.
//!
//! ```rust
//! use rxmarble::{ops::RetryConfig, prelude::*};
//! use std::{cell::Cell, rc::Rc, time::Duration};
//!
//! let attempts = Rc::new(Cell::new(0));
//! let c_attempts = attempts.clone();
//! let source = Observable::<i32, &str>::new(move |subscriber| {
//!   c_attempts.set(c_attempts.get() + 1);
//!   subscriber.error("unreachable");
//! });
//!
//! let scheduler = VirtualScheduler::new();
//! source
//!   .retry_with(RetryConfig::new().count(2).delay(Duration::from_millis(10)), scheduler.clone())
//!   .subscribe_err(|_| {}, |_| {});
//! scheduler.flush();
//! assert_eq!(attempts.get(), 3);
//! assert_eq!(scheduler.now(), Duration::from_millis(20));
//! ```
//!
//! [`retry_with`]: crate::observable::Observable::retry_with
use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::{ImmediateScheduler, Scheduler},
  subscriber::Subscriber,
};

/// Decides whether an error is retried.
///
/// Implemented for `usize` (a plain retry count without delay) and
/// [`RetryConfig`]; implement it for custom rules such as retrying only
/// some error kinds.
pub trait RetryPolicy<Err>: Clone + 'static {
  /// `Some(delay)` to resubscribe after `delay`, `None` to give up and
  /// forward `err`. `attempt` counts the retries already made, starting at 0.
  fn should_retry(&self, err: &Err, attempt: usize) -> Option<Duration>;

  /// Whether a successful value resets the attempt counter.
  fn reset_on_success(&self) -> bool { false }
}

impl<Err> RetryPolicy<Err> for usize {
  fn should_retry(&self, _err: &Err, attempt: usize) -> Option<Duration> {
    if attempt < *self { Some(Duration::ZERO) } else { None }
  }
}

/// Builder for the common retry policy: a maximum count, a fixed delay and
/// optionally resetting the count on success.
///
/// ```rust
/// use rxmarble::ops::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///   .count(5)
///   .delay(Duration::from_secs(1))
///   .reset_on_success();
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetryConfig {
  count: Option<usize>,
  delay: Option<Duration>,
  reset_on_success: bool,
}

impl RetryConfig {
  /// Unlimited retries without delay until configured otherwise.
  pub fn new() -> Self { Self::default() }

  /// At most `count` retries, so `count + 1` subscriptions in total.
  pub fn count(mut self, count: usize) -> Self {
    self.count = Some(count);
    self
  }

  pub fn delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }
}

impl<Err> RetryPolicy<Err> for RetryConfig {
  fn should_retry(&self, _err: &Err, attempt: usize) -> Option<Duration> {
    match self.count {
      Some(count) if attempt >= count => None,
      _ => Some(self.delay.unwrap_or(Duration::ZERO)),
    }
  }

  fn reset_on_success(&self) -> bool { self.reset_on_success }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Resubscribes to this stream up to `count` times when it errors.
  pub fn retry(self, count: usize) -> Observable<Item, Err> { self.retry_with(count, ImmediateScheduler) }

  /// Resubscribes according to `policy`, waiting on `scheduler` when the
  /// policy asks for a delay.
  pub fn retry_with<P, S>(self, policy: P, scheduler: S) -> Observable<Item, Err>
  where
    P: RetryPolicy<Err>,
    S: Scheduler,
  {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = Rc::new(RetryState {
        source: self.clone(),
        observer: subscriber,
        policy: policy.clone(),
        scheduler: scheduler.clone(),
        attempt: Cell::new(0),
      });
      subscribe_source(&state);
    })
  }
}

struct RetryState<Item, Err, P, S> {
  source: Observable<Item, Err>,
  observer: Subscriber<Item, Err>,
  policy: P,
  scheduler: S,
  attempt: Cell<usize>,
}

fn subscribe_source<Item, Err, P, S>(state: &Rc<RetryState<Item, Err, P, S>>)
where
  Item: 'static,
  Err: 'static,
  P: RetryPolicy<Err>,
  S: Scheduler,
{
  if state.observer.is_closed() {
    return;
  }
  let subscription = state.source.subscribe_with(RetryObserver(state.clone()));
  state.observer.add(subscription);
}

struct RetryObserver<Item, Err, P, S>(Rc<RetryState<Item, Err, P, S>>);

impl<Item, Err, P, S> Observer<Item, Err> for RetryObserver<Item, Err, P, S>
where
  Item: 'static,
  Err: 'static,
  P: RetryPolicy<Err>,
  S: Scheduler,
{
  fn next(&mut self, value: Item) {
    if self.0.policy.reset_on_success() {
      self.0.attempt.set(0);
    }
    self.0.observer.next(value);
  }

  fn error(&mut self, err: Err) {
    let state = &self.0;
    let attempt = state.attempt.get();
    match state.policy.should_retry(&err, attempt) {
      None => state.observer.error(err),
      Some(delay) => {
        state.attempt.set(attempt + 1);
        tracing::trace!(attempt = attempt + 1, ?delay, "retrying source");
        if delay.is_zero() {
          subscribe_source(state);
        } else {
          let c_state = state.clone();
          let handle = state.scheduler.schedule(Some(delay), move || subscribe_source(&c_state));
          state.observer.add(handle);
        }
      }
    }
  }

  #[inline]
  fn complete(&mut self) { self.0.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.observer.is_closed() }
}
