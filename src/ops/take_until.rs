use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Mirrors this stream until `notifier` emits, then completes.
  ///
  /// The notifier is subscribed first, so one that emits synchronously
  /// prevents the source from being subscribed at all. A notifier error is
  /// forwarded; its completion is ignored.
  pub fn take_until<N: 'static>(self, notifier: Observable<N, Err>) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      subscriber.add(notifier.subscribe_with(TakeUntilNotifierObserver { observer: subscriber.clone() }));
      if subscriber.is_closed() {
        return None;
      }
      Some(self.subscribe_with(subscriber.clone()))
    })
  }
}

struct TakeUntilNotifierObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, N, Err: 'static> Observer<N, Err> for TakeUntilNotifierObserver<Item, Err> {
  fn next(&mut self, _: N) { self.observer.complete() }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {}

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::{
    observable::{empty, from_iter, of},
    subject::Subject,
  };
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn completes_when_notifier_emits() {
    let source = Subject::<i32, ()>::new();
    let notifier = Subject::<(), ()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (c_log, d_log) = (log.clone(), log.clone());
    source
      .as_observable()
      .take_until(notifier.as_observable())
      .subscribe_complete(move |v| c_log.borrow_mut().push(v), move || d_log.borrow_mut().push(-1));
    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);
    assert_eq!(*log.borrow(), vec![1, 2, -1]);
    assert_eq!(source.observer_count(), 0);
  }

  #[test]
  fn synchronous_notifier_skips_source() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    from_iter::<_, ()>(0..3).take_until(of(())).subscribe(move |v| c_log.borrow_mut().push(v));
    assert!(log.borrow().is_empty());
  }

  #[test]
  fn notifier_completion_is_ignored() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    from_iter::<_, ()>(0..3).take_until(empty::<(), ()>()).subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
  }
}
