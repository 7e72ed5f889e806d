//! When work runs.
//!
//! Every operator that waits (`timer`, `interval`, `delay`, `debounce_time`,
//! `throttle_time`, retry backoff) takes a [`Scheduler`] argument instead of
//! sleeping on the wall clock, so tests can hand in a [`VirtualScheduler`].
//!
//! | Scheduler | Runs a task |
//! |-----------|-------------|
//! | [`ImmediateScheduler`] | synchronously; nested schedules are trampolined |
//! | [`DeferredScheduler`] | on a thread-local event loop driven by [`DeferredScheduler::run`] |
//! | [`VirtualScheduler`] | when its logical clock is advanced past the task's due time |
use std::{cell::RefCell, rc::Rc, time::Duration};

use crate::subscription::{Subscription, SubscriptionLike};

#[cfg(feature = "futures-scheduler")]
mod deferred;
mod immediate;
mod task_queue;
mod virtual_time;

#[cfg(feature = "futures-scheduler")]
pub use deferred::DeferredScheduler;
pub use immediate::ImmediateScheduler;
pub use virtual_time::VirtualScheduler;

/// A source of time and a place to queue work.
pub trait Scheduler: Clone + 'static {
  /// Current time of this scheduler's clock.
  fn now(&self) -> Duration;

  /// Runs `task` once `delay` has elapsed (as soon as possible for `None`).
  ///
  /// The returned handle cancels the task; it is closed once the task ran.
  fn schedule<F>(&self, delay: Option<Duration>, task: F) -> Subscription
  where
    F: FnOnce() + 'static;

  /// Runs `task` after `delay` and then every `period`, passing the zero-based
  /// tick count, until the returned handle is unsubscribed.
  fn schedule_periodic<F>(&self, delay: Duration, period: Duration, task: F) -> Subscription
  where
    F: FnMut(usize) + 'static,
  {
    let handle = Subscription::new();
    self.schedule_periodic_into(delay, period, handle.clone(), task);
    handle
  }

  /// Like [`schedule_periodic`](Scheduler::schedule_periodic), but ticks into
  /// a `handle` the caller already holds.
  ///
  /// Ticking stops as soon as `handle` closes, even while this call has not
  /// returned yet, which is what happens on a synchronous scheduler.
  fn schedule_periodic_into<F>(&self, delay: Duration, period: Duration, handle: Subscription, task: F)
  where
    F: FnMut(usize) + 'static,
  {
    periodic_tick(self.clone(), delay, period, 0, Rc::new(RefCell::new(task)), handle);
  }
}

fn periodic_tick<S, F>(
  scheduler: S, delay: Duration, period: Duration, tick: usize, task: Rc<RefCell<F>>,
  handle: Subscription,
) where
  S: Scheduler,
  F: FnMut(usize) + 'static,
{
  if handle.is_closed() {
    return;
  }
  let c_scheduler = scheduler.clone();
  let c_handle = handle.clone();
  let scheduled = scheduler.schedule(Some(delay), move || {
    if c_handle.is_closed() {
      return;
    }
    (task.borrow_mut())(tick);
    periodic_tick(c_scheduler, period, period, tick + 1, task, c_handle);
  });
  handle.add(scheduled);
}
