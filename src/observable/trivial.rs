use crate::{observable::Observable, subscriber::Subscriber};

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
pub fn empty<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::new(|subscriber: Subscriber<Item, Err>| subscriber.complete())
}

/// Creates an observable that never emits anything, not even a terminal
/// notification.
pub fn never<Item: 'static, Err: 'static>() -> Observable<Item, Err> {
  Observable::new(|_: Subscriber<Item, Err>| {})
}

/// Creates an observable that emits no items, just terminates with an error.
pub fn throw_err<Item, Err>(err: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + 'static,
{
  Observable::new(move |subscriber: Subscriber<Item, Err>| subscriber.error(err.clone()))
}
