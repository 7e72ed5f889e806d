use std::{cell::RefCell, rc::Rc, time::Duration};

use super::{task_queue::TaskQueue, Scheduler};
use crate::subscription::Subscription;

/// A scheduler over a logical clock.
///
/// Nothing runs until the clock is moved with [`advance_by`], [`advance_to`]
/// or [`flush`]; tasks then run in (due time, scheduling order). Clones share
/// the same clock and queue, and separate instances are fully independent.
///
/// [`advance_by`]: VirtualScheduler::advance_by
/// [`advance_to`]: VirtualScheduler::advance_to
/// [`flush`]: VirtualScheduler::flush
///
/// ```rust
/// use rxmarble::prelude::*;
/// use std::{cell::Cell, rc::Rc, time::Duration};
///
/// let scheduler = VirtualScheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let c_fired = fired.clone();
/// scheduler.schedule(Some(Duration::from_millis(10)), move || c_fired.set(true));
///
/// scheduler.advance_by(Duration::from_millis(9));
/// assert!(!fired.get());
/// scheduler.advance_by(Duration::from_millis(1));
/// assert!(fired.get());
/// ```
#[derive(Clone, Default)]
pub struct VirtualScheduler(Rc<RefCell<VirtualState>>);

#[derive(Default)]
struct VirtualState {
  now: Duration,
  queue: TaskQueue,
}

impl VirtualScheduler {
  pub fn new() -> Self { Self::default() }

  /// Moves the clock forward by `duration`, running every task due meanwhile.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.0.borrow().now + duration;
    self.advance_to(target);
  }

  /// Moves the clock to `target`, running every task due until then. The
  /// clock never goes backwards.
  pub fn advance_to(&self, target: Duration) {
    tracing::debug!(from = ?self.0.borrow().now, to = ?target, "advancing virtual clock");
    self.run_until(Some(target));
    let mut state = self.0.borrow_mut();
    state.now = state.now.max(target);
  }

  /// Runs tasks until the queue is empty, including tasks scheduled by the
  /// tasks themselves.
  pub fn flush(&self) { self.run_until(None) }

  /// Like [`flush`](VirtualScheduler::flush) but leaves tasks due after
  /// `limit` in the queue.
  pub fn flush_until(&self, limit: Duration) { self.run_until(Some(limit)) }

  /// Number of tasks that are still waiting to run.
  pub fn pending_count(&self) -> usize { self.0.borrow().queue.pending_count() }

  pub fn is_empty(&self) -> bool { self.pending_count() == 0 }

  /// Drops every pending task and rewinds the clock to zero.
  pub fn reset(&self) {
    let mut state = self.0.borrow_mut();
    state.queue.clear();
    state.now = Duration::ZERO;
  }

  fn run_until(&self, limit: Option<Duration>) {
    loop {
      let task = {
        let mut state = self.0.borrow_mut();
        let Some(task) = state.queue.pop_until(limit) else {
          break;
        };
        state.now = state.now.max(task.due);
        task
      };
      tracing::trace!(due = ?task.due, "running virtual task");
      task.run();
    }
  }
}

impl Scheduler for VirtualScheduler {
  fn now(&self) -> Duration { self.0.borrow().now }

  fn schedule<F>(&self, delay: Option<Duration>, task: F) -> Subscription
  where
    F: FnOnce() + 'static,
  {
    let mut state = self.0.borrow_mut();
    let due = state.now + delay.unwrap_or(Duration::ZERO);
    state.queue.push(due, Box::new(task))
  }
}
