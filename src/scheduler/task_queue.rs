use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use crate::subscription::{Subscription, SubscriptionLike};

pub(crate) struct ScheduledTask {
  pub(crate) due: Duration,
  seq: u64,
  task: Box<dyn FnOnce()>,
  handle: Subscription,
}

impl ScheduledTask {
  /// Runs the task unless it was cancelled, then marks its handle finished.
  pub(crate) fn run(self) {
    if !self.handle.is_closed() {
      (self.task)();
    }
    self.handle.unsubscribe();
  }
}

impl PartialEq for ScheduledTask {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.seq == other.seq }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ScheduledTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by sequence
    other.due.cmp(&self.due).then_with(|| other.seq.cmp(&self.seq))
  }
}

/// Pending tasks keyed by (due time, insertion sequence).
#[derive(Default)]
pub(crate) struct TaskQueue {
  heap: BinaryHeap<ScheduledTask>,
  next_seq: u64,
}

impl TaskQueue {
  pub(crate) fn push(&mut self, due: Duration, task: Box<dyn FnOnce()>) -> Subscription {
    let handle = Subscription::new();
    let seq = self.next_seq;
    self.next_seq += 1;
    self.heap.push(ScheduledTask { due, seq, task, handle: handle.clone() });
    handle
  }

  /// Pops the earliest task, provided it is due no later than `limit`.
  pub(crate) fn pop_until(&mut self, limit: Option<Duration>) -> Option<ScheduledTask> {
    while self.heap.peek()?.handle.is_closed() {
      self.heap.pop();
    }
    let due = self.heap.peek()?.due;
    if limit.is_some_and(|limit| due > limit) {
      return None;
    }
    self.heap.pop()
  }

  /// Tasks that were neither cancelled nor run yet.
  pub(crate) fn pending_count(&self) -> usize {
    self.heap.iter().filter(|t| !t.handle.is_closed()).count()
  }

  pub(crate) fn clear(&mut self) { self.heap.clear() }
}
