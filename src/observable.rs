//! The producer side of a stream.
//!
//! An [`Observable`] is a lazy description of a push-based computation: it
//! holds one producer function and runs it anew for every subscriber. Free
//! functions in this module create the common sources; operators live in
//! [`crate::ops`].
use std::{fmt::Debug, rc::Rc};

use crate::{
  error::report_unhandled,
  observer::{FnObserver, Observer},
  subscriber::Subscriber,
  subscription::{Subscription, Teardown},
};

mod combine_latest;
mod concat;
mod defer;
mod fork_join;
mod from_event;
mod from_iter;
mod from_promise;
mod interval;
mod merge;
mod of;
mod timer;
mod trivial;

pub use combine_latest::*;
pub use concat::*;
pub use defer::*;
pub use fork_join::*;
pub use from_event::*;
pub use from_iter::*;
pub use from_promise::*;
pub use interval::*;
pub use merge::*;
pub use of::*;
pub use timer::*;
pub use trivial::*;

type Producer<Item, Err> = dyn Fn(Subscriber<Item, Err>) -> Teardown;

/// A cold, re-runnable stream of `Item`s that may fail with `Err`.
///
/// Cloning is cheap and shares the producer; every `subscribe` still starts an
/// independent execution.
pub struct Observable<Item, Err> {
  producer: Rc<Producer<Item, Err>>,
}

impl<Item, Err> Clone for Observable<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Observable { producer: self.producer.clone() } }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Creates an observable from a producer function.
  ///
  /// The producer runs synchronously inside every `subscribe` call. It emits
  /// into the given [`Subscriber`], which may also be moved into scheduled
  /// work, and returns what has to happen on unsubscription: nothing (`()`),
  /// a [`Subscription`], or a [`Teardown`].
  ///
  /// ```rust
  /// use rxmarble::prelude::*;
  /// use std::{cell::RefCell, rc::Rc};
  ///
  /// let source = Observable::<i32, ()>::new(|subscriber| {
  ///   subscriber.next(1);
  ///   subscriber.next(2);
  ///   subscriber.complete();
  /// });
  ///
  /// let seen = Rc::new(RefCell::new(vec![]));
  /// let c_seen = seen.clone();
  /// source.subscribe(move |v| c_seen.borrow_mut().push(v));
  /// assert_eq!(*seen.borrow(), vec![1, 2]);
  /// ```
  pub fn new<F, R>(producer: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) -> R + 'static,
    R: Into<Teardown>,
  {
    Observable { producer: Rc::new(move |subscriber| producer(subscriber).into()) }
  }

  /// Subscribes an [`Observer`] and returns the handle of this execution.
  pub fn subscribe_with<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscriber = Subscriber::new(observer);
    let teardown = (self.producer)(subscriber.clone());
    subscriber.add(teardown);
    subscriber.subscription()
  }

  /// Subscribes with a `next` callback only.
  ///
  /// A stream error reaching this subscriber is handed to
  /// [`report_unhandled`](crate::error::report_unhandled).
  pub fn subscribe<N>(&self, next: N) -> Subscription
  where
    N: FnMut(Item) + 'static,
    Err: Debug,
  {
    self.subscribe_with(FnObserver::new(next, report_unhandled::<Err>, || {}))
  }

  pub fn subscribe_err<N, E>(&self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnOnce(Err) + 'static,
  {
    self.subscribe_with(FnObserver::new(next, error, || {}))
  }

  /// Subscribes with a `complete` callback; errors are reported as unhandled.
  pub fn subscribe_complete<N, C>(&self, next: N, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    C: FnOnce() + 'static,
    Err: Debug,
  {
    self.subscribe_with(FnObserver::new(next, report_unhandled::<Err>, complete))
  }

  pub fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item) + 'static,
    E: FnOnce(Err) + 'static,
    C: FnOnce() + 'static,
  {
    self.subscribe_with(FnObserver::new(next, error, complete))
  }

  /// Applies a function from observable to observable, which is all an
  /// operator is.
  #[inline]
  pub fn pipe<R>(self, operator: impl FnOnce(Self) -> R) -> R { operator(self) }
}
