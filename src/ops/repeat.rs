use std::{cell::Cell, rc::Rc};

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Subscribes to this stream `count` times in a row, each time after the
  /// previous run completed. `repeat(0)` completes immediately.
  pub fn repeat(self, count: usize) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      if count == 0 {
        subscriber.complete();
        return;
      }
      let state = Rc::new(RepeatState { source: self.clone(), observer: subscriber, remaining: Cell::new(count) });
      subscribe_source(&state);
    })
  }
}

struct RepeatState<Item, Err> {
  source: Observable<Item, Err>,
  observer: Subscriber<Item, Err>,
  remaining: Cell<usize>,
}

fn subscribe_source<Item: 'static, Err: 'static>(state: &Rc<RepeatState<Item, Err>>) {
  if state.observer.is_closed() {
    return;
  }
  state.remaining.set(state.remaining.get() - 1);
  let subscription = state.source.subscribe_with(RepeatObserver(state.clone()));
  state.observer.add(subscription);
}

struct RepeatObserver<Item, Err>(Rc<RepeatState<Item, Err>>);

impl<Item: 'static, Err: 'static> Observer<Item, Err> for RepeatObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.0.observer.next(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.observer.error(err) }

  fn complete(&mut self) {
    if self.0.remaining.get() == 0 {
      self.0.observer.complete();
    } else {
      subscribe_source(&self.0);
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.observer.is_closed() }
}
