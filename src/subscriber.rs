use std::{
  cell::{Cell, RefCell},
  collections::VecDeque,
  rc::Rc,
};

use crate::{
  notification::Notification,
  observer::{BoxedObserver, Observer},
  subscription::{Subscription, SubscriptionLike, Teardown},
};

/// The guarded observer a producer emits into.
///
/// A `Subscriber` wraps the observer given to `subscribe` together with the
/// [`Subscription`] of that execution and enforces the observer lifecycle:
///
/// - nothing is delivered after `error`, `complete`, or after the subscription
///   closed, and at most one terminal notification ever reaches the observer;
/// - after a terminal notification has been delivered the subscription closes,
///   running every teardown of the execution;
/// - a notification emitted from inside the observer's own callback is queued
///   and delivered once the in-flight callback returns, so notifications keep
///   their order and never nest.
///
/// Cloning yields another handle to the same subscriber, which lets producers
/// move it into scheduled tasks.
pub struct Subscriber<Item, Err> {
  inner: Rc<Inner<Item, Err>>,
}

struct Inner<Item, Err> {
  observer: RefCell<Option<BoxedObserver<Item, Err>>>,
  pending: RefCell<VecDeque<Notification<Item, Err>>>,
  stopped: Cell<bool>,
  subscription: Subscription,
}

impl<Item, Err> Inner<Item, Err> {
  fn release(&self) {
    let observer = self.observer.try_borrow_mut().ok().and_then(|mut o| o.take());
    drop(observer);
    self.pending.borrow_mut().clear();
  }
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Subscriber { inner: self.inner.clone() } }
}

impl<Item: 'static, Err: 'static> Subscriber<Item, Err> {
  pub fn new<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + 'static,
  {
    let observer: BoxedObserver<Item, Err> = Box::new(observer);
    let inner = Rc::new(Inner {
      observer: RefCell::new(Some(observer)),
      pending: RefCell::new(VecDeque::new()),
      stopped: Cell::new(false),
      subscription: Subscription::new(),
    });
    let weak = Rc::downgrade(&inner);
    inner.subscription.add(Teardown::from_fn(move || {
      if let Some(inner) = weak.upgrade() {
        inner.release();
      }
    }));
    Subscriber { inner }
  }

  pub fn next(&self, value: Item) {
    if !self.is_closed() {
      self.deliver(Notification::Next(value));
    }
  }

  pub fn error(&self, err: Err) {
    if !self.is_closed() {
      self.inner.stopped.set(true);
      self.deliver(Notification::Error(err));
    }
  }

  pub fn complete(&self) {
    if !self.is_closed() {
      self.inner.stopped.set(true);
      self.deliver(Notification::Complete);
    }
  }

  /// `true` once a terminal notification was emitted, the subscription was
  /// closed, or the wrapped observer reports that it accepts nothing more.
  pub fn is_closed(&self) -> bool {
    let inner = &*self.inner;
    inner.stopped.get()
      || inner.subscription.is_closed()
      || inner
        .observer
        .try_borrow()
        .map_or(false, |o| o.as_ref().map_or(true, |o| o.is_closed()))
  }

  /// Ties `teardown` to this execution.
  #[inline]
  pub fn add(&self, teardown: impl Into<Teardown>) { self.inner.subscription.add(teardown) }

  #[inline]
  pub fn subscription(&self) -> Subscription { self.inner.subscription.clone() }

  #[inline]
  pub fn unsubscribe(&self) { self.inner.subscription.unsubscribe() }

  fn deliver(&self, notification: Notification<Item, Err>) {
    let inner = &*self.inner;
    let Ok(mut observer) = inner.observer.try_borrow_mut() else {
      inner.pending.borrow_mut().push_back(notification);
      return;
    };

    let mut terminated = false;
    let mut current = Some(notification);
    while let Some(notification) = current.take().or_else(|| inner.pending.borrow_mut().pop_front()) {
      if inner.subscription.is_closed() {
        break;
      }
      match notification {
        Notification::Next(v) => {
          if let Some(o) = observer.as_mut() {
            o.next(v);
          }
        }
        Notification::Error(e) => {
          if let Some(mut o) = observer.take() {
            o.error(e);
          }
          terminated = true;
          break;
        }
        Notification::Complete => {
          if let Some(mut o) = observer.take() {
            o.complete();
          }
          terminated = true;
          break;
        }
      }
    }

    let released = if inner.subscription.is_closed() { observer.take() } else { None };
    drop(observer);
    drop(released);
    if terminated {
      inner.subscription.unsubscribe();
    }
  }
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for Subscriber<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subscriber::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subscriber::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subscriber::complete(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}

impl<Item: 'static, Err: 'static> SubscriptionLike for Subscriber<Item, Err> {
  #[inline]
  fn unsubscribe(&self) { Subscriber::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { Subscriber::is_closed(self) }
}
