use std::{cell::RefCell, collections::VecDeque, time::Duration};

use once_cell::sync::Lazy;

use super::Scheduler;
use crate::subscription::{Subscription, SubscriptionLike};

static EPOCH: Lazy<std::time::Instant> = Lazy::new(std::time::Instant::now);

/// Wall-clock time since the first time any scheduler asked for it.
pub(crate) fn clock() -> Duration { EPOCH.elapsed() }

type Job = Box<dyn FnOnce()>;

thread_local! {
  static TRAMPOLINE: RefCell<Option<VecDeque<Job>>> = RefCell::new(None);
}

/// Runs tasks on the calling thread, right away.
///
/// A task scheduled while another immediate task is running is queued and run
/// after it, in FIFO order, instead of recursing. A non-zero delay blocks the
/// current thread for that long.
#[derive(Clone, Copy, Default, Debug)]
pub struct ImmediateScheduler;

struct DrainGuard;

impl Drop for DrainGuard {
  fn drop(&mut self) { TRAMPOLINE.with(|q| *q.borrow_mut() = None) }
}

impl Scheduler for ImmediateScheduler {
  fn now(&self) -> Duration { clock() }

  fn schedule<F>(&self, delay: Option<Duration>, task: F) -> Subscription
  where
    F: FnOnce() + 'static,
  {
    let handle = Subscription::new();
    let c_handle = handle.clone();
    let job: Job = Box::new(move || {
      if let Some(delay) = delay.filter(|d| !d.is_zero()) {
        std::thread::sleep(delay);
      }
      if !c_handle.is_closed() {
        task();
      }
      c_handle.unsubscribe();
    });

    let first = TRAMPOLINE.with(|q| {
      let mut q = q.borrow_mut();
      match q.as_mut() {
        Some(queue) => {
          queue.push_back(job);
          None
        }
        None => {
          *q = Some(VecDeque::new());
          Some(job)
        }
      }
    });

    if let Some(job) = first {
      let _guard = DrainGuard;
      job();
      while let Some(job) = TRAMPOLINE.with(|q| q.borrow_mut().as_mut().and_then(VecDeque::pop_front)) {
        job();
      }
    }
    handle
  }
}
