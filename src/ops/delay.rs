use std::time::Duration;

use crate::{observable::Observable, observer::Observer, scheduler::Scheduler, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Shifts every value and the completion later by `delay` on `scheduler`.
  /// Errors are forwarded at once and drop the values still in flight.
  pub fn delay<S: Scheduler>(self, delay: Duration, scheduler: S) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      self.subscribe_with(DelayObserver { observer: subscriber, delay, scheduler: scheduler.clone() })
    })
  }
}

struct DelayObserver<Item, Err, S> {
  observer: Subscriber<Item, Err>,
  delay: Duration,
  scheduler: S,
}

impl<Item: 'static, Err: 'static, S: Scheduler> Observer<Item, Err> for DelayObserver<Item, Err, S> {
  fn next(&mut self, value: Item) {
    let observer = self.observer.clone();
    let handle = self.scheduler.schedule(Some(self.delay), move || observer.next(value));
    self.observer.add(handle);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let observer = self.observer.clone();
    let handle = self.scheduler.schedule(Some(self.delay), move || observer.complete());
    self.observer.add(handle);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
