use std::time::Duration;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits a value only after `duration` passed without another value.
  ///
  /// A value still waiting when the source completes is emitted right
  /// before the completion.
  pub fn debounce_time<S: Scheduler>(self, duration: Duration, scheduler: S) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = MutRc::own(DebounceState { pending: None, handle: None });
      self.subscribe_with(DebounceObserver { observer: subscriber, duration, scheduler: scheduler.clone(), state })
    })
  }
}

struct DebounceState<Item> {
  pending: Option<Item>,
  handle: Option<Subscription>,
}

struct DebounceObserver<Item, Err, S> {
  observer: Subscriber<Item, Err>,
  duration: Duration,
  scheduler: S,
  state: MutRc<DebounceState<Item>>,
}

impl<Item: 'static, Err: 'static, S: Scheduler> Observer<Item, Err> for DebounceObserver<Item, Err, S> {
  fn next(&mut self, value: Item) {
    let previous = {
      let mut state = self.state.rc_deref_mut();
      state.pending = Some(value);
      state.handle.take()
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
    let state = self.state.clone();
    let observer = self.observer.clone();
    let handle = self.scheduler.schedule(Some(self.duration), move || {
      let value = {
        let mut state = state.rc_deref_mut();
        state.handle = None;
        state.pending.take()
      };
      if let Some(value) = value {
        observer.next(value);
      }
    });
    self.state.rc_deref_mut().handle = Some(handle.clone());
    self.observer.add(handle);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let (value, handle) = {
      let mut state = self.state.rc_deref_mut();
      (state.pending.take(), state.handle.take())
    };
    if let Some(handle) = handle {
      handle.unsubscribe();
    }
    if let Some(value) = value {
      self.observer.next(value);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{
    scheduler::{Scheduler, VirtualScheduler},
    subject::Subject,
  };
  use std::{cell::RefCell, rc::Rc, time::Duration};

  #[test]
  fn emits_after_quiet_period() {
    let scheduler = VirtualScheduler::new();
    let subject = Subject::<i32, ()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let c_scheduler = scheduler.clone();
    subject
      .as_observable()
      .debounce_time(Duration::from_millis(3), scheduler.clone())
      .subscribe(move |v| c_log.borrow_mut().push((v, c_scheduler.now().as_millis())));
    subject.next(1);
    scheduler.advance_by(Duration::from_millis(2));
    subject.next(2);
    scheduler.advance_by(Duration::from_millis(5));
    subject.next(3);
    scheduler.advance_by(Duration::from_millis(1));
    subject.complete();
    assert_eq!(*log.borrow(), vec![(2, 5), (3, 8)]);
    assert!(scheduler.is_empty());
  }
}
