use std::rc::Rc;

use crate::{observable::Observable, subscriber::Subscriber, subscription::Teardown};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Calls `f` when the subscription ends for any reason: completion, error
  /// or unsubscription. It runs after the source has been torn down.
  pub fn finalize<F>(self, f: F) -> Observable<Item, Err>
  where
    F: Fn() + 'static,
  {
    let func = Rc::new(f);
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      subscriber.add(self.subscribe_with(subscriber.clone()));
      let func = func.clone();
      Teardown::from_fn(move || func())
    })
  }
}
