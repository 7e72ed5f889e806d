use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Recovers from an error by switching to the observable `handler` builds
  /// from it. The replacement feeds the same downstream observer; its own
  /// errors are not caught again.
  pub fn catch_error<Err2, F>(self, handler: F) -> Observable<Item, Err2>
  where
    Err2: 'static,
    F: Fn(Err) -> Observable<Item, Err2> + 'static,
  {
    let handler = Rc::new(handler);
    Observable::new(move |subscriber: Subscriber<Item, Err2>| {
      self.subscribe_with(CatchErrorObserver { observer: subscriber, handler: handler.clone() })
    })
  }
}

struct CatchErrorObserver<Item, Err2, F> {
  observer: Subscriber<Item, Err2>,
  handler: Rc<F>,
}

impl<Item, Err, Err2, F> Observer<Item, Err> for CatchErrorObserver<Item, Err2, F>
where
  Item: 'static,
  Err2: 'static,
  F: Fn(Err) -> Observable<Item, Err2>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, err: Err) {
    let replacement = (self.handler)(err);
    self.observer.add(replacement.subscribe_with(self.observer.clone()));
  }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
