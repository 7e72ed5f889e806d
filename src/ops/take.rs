use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits only the first `count` values, then completes and unsubscribes
  /// from the source. `take(0)` completes without subscribing at all.
  pub fn take(self, count: usize) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      if count == 0 {
        subscriber.complete();
        return None;
      }
      Some(self.subscribe_with(TakeObserver { observer: subscriber, remaining: count }))
    })
  }
}

struct TakeObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  remaining: usize,
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for TakeObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
      self.observer.next(value);
      if self.remaining == 0 {
        self.observer.complete();
      }
    }
  }

  forward_terminals!(observer, Err);
}
