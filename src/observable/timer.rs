use std::time::Duration;

use crate::{
  observable::Observable,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Emits `0` after `delay` on `scheduler`, then completes.
pub fn timer<Err, S>(delay: Duration, scheduler: S) -> Observable<usize, Err>
where
  Err: 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber: Subscriber<usize, Err>| {
    scheduler.schedule(Some(delay), move || {
      subscriber.next(0);
      subscriber.complete();
    })
  })
}

/// Emits `0` once the scheduler's clock reads `at` (immediately when that
/// moment already passed), then completes.
pub fn timer_at<Err, S>(at: Duration, scheduler: S) -> Observable<usize, Err>
where
  Err: 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber: Subscriber<usize, Err>| {
    let delay = at.saturating_sub(scheduler.now());
    scheduler.schedule(Some(delay), move || {
      subscriber.next(0);
      subscriber.complete();
    })
  })
}

/// Emits `0` after `delay`, then `1, 2, ...` every `period`. Never completes.
pub fn timer_periodic<Err, S>(delay: Duration, period: Duration, scheduler: S) -> Observable<usize, Err>
where
  Err: 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber: Subscriber<usize, Err>| {
    let handle = Subscription::new();
    subscriber.add(handle.clone());
    let c_handle = handle.clone();
    scheduler.schedule_periodic_into(delay, period, handle.clone(), move |tick| {
      subscriber.next(tick);
      if subscriber.is_closed() {
        c_handle.unsubscribe();
      }
    });
    handle
  })
}
