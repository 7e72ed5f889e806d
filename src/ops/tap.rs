use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Calls `f` with every value before passing it on unchanged.
  pub fn tap<F>(self, f: F) -> Observable<Item, Err>
  where
    F: Fn(&Item) + 'static,
  {
    let func = Rc::new(f);
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      self.subscribe_with(TapObserver { observer: subscriber, func: func.clone() })
    })
  }
}

struct TapObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  func: Rc<F>,
}

impl<Item: 'static, Err: 'static, F: Fn(&Item)> Observer<Item, Err> for TapObserver<Item, Err, F> {
  fn next(&mut self, value: Item) {
    (self.func)(&value);
    self.observer.next(value);
  }

  forward_terminals!(observer, Err);
}
