use std::{cell::RefCell, future::Future, time::Duration};

use futures::{
  executor::{LocalPool, LocalSpawner},
  task::LocalSpawnExt,
};

use super::{immediate::clock, task_queue::TaskQueue, Scheduler};
use crate::subscription::Subscription;

thread_local! {
  static TIMERS: RefCell<TaskQueue> = RefCell::new(TaskQueue::default());
  static POOL: RefCell<LocalPool> = RefCell::new(LocalPool::new());
  static SPAWNER: LocalSpawner = POOL.with(|pool| pool.borrow().spawner());
}

/// Queues tasks on a thread-local event loop.
///
/// Scheduling returns immediately; the task runs only when the loop is driven
/// by [`DeferredScheduler::run`], after the current call stack has unwound.
/// Tasks run in due-time order and, for equal due times, in the order they
/// were scheduled. Futures spawned with [`DeferredScheduler::spawn_local`] are
/// polled by the same loop.
#[derive(Clone, Copy, Default, Debug)]
pub struct DeferredScheduler;

impl DeferredScheduler {
  /// Spawns `future` onto the loop's local executor.
  pub fn spawn_local<F>(future: F)
  where
    F: Future<Output = ()> + 'static,
  {
    if let Err(err) = SPAWNER.with(|spawner| spawner.spawn_local(future)) {
      tracing::warn!(%err, "deferred scheduler could not spawn future");
    }
  }

  /// Drives the loop until no timer is queued and every spawned future is
  /// stalled, sleeping the thread until the next timer is due.
  ///
  /// # Panics
  ///
  /// Panics when called from a task or future the loop is running.
  pub fn run() {
    // The spawner must exist before the pool is borrowed for polling.
    SPAWNER.with(|_| ());
    loop {
      POOL.with(|pool| pool.borrow_mut().run_until_stalled());
      let Some(task) = TIMERS.with(|timers| timers.borrow_mut().pop_until(None)) else {
        break;
      };
      let now = clock();
      if task.due > now {
        std::thread::sleep(task.due - now);
      }
      tracing::trace!(due = ?task.due, "running deferred task");
      task.run();
    }
  }

  /// Number of timers waiting to run.
  pub fn pending_count() -> usize { TIMERS.with(|timers| timers.borrow().pending_count()) }
}

impl Scheduler for DeferredScheduler {
  fn now(&self) -> Duration { clock() }

  fn schedule<F>(&self, delay: Option<Duration>, task: F) -> Subscription
  where
    F: FnOnce() + 'static,
  {
    let due = clock() + delay.unwrap_or(Duration::ZERO);
    TIMERS.with(|timers| timers.borrow_mut().push(due, Box::new(task)))
  }
}
