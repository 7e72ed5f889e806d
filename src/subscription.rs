use smallvec::SmallVec;
use std::{
  cell::RefCell,
  fmt::{Debug, Formatter},
  rc::Rc,
};

/// A handle to work that can be cancelled.
pub trait SubscriptionLike {
  /// Cancels the work and releases everything it owns. Calling it again is a
  /// no-op.
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

/// What a producer hands back to be run when its subscription closes.
pub enum Teardown {
  Empty,
  Callback(Box<dyn FnOnce()>),
  Subscription(Subscription),
}

impl Teardown {
  pub fn from_fn(f: impl FnOnce() + 'static) -> Self { Teardown::Callback(Box::new(f)) }

  fn execute(self) {
    match self {
      Teardown::Empty => {}
      Teardown::Callback(f) => f(),
      Teardown::Subscription(s) => s.unsubscribe(),
    }
  }

  fn is_closed(&self) -> bool {
    match self {
      Teardown::Empty => true,
      Teardown::Callback(_) => false,
      Teardown::Subscription(s) => s.is_closed(),
    }
  }
}

impl From<()> for Teardown {
  #[inline]
  fn from(_: ()) -> Self { Teardown::Empty }
}

impl From<Subscription> for Teardown {
  #[inline]
  fn from(s: Subscription) -> Self { Teardown::Subscription(s) }
}

impl From<Option<Subscription>> for Teardown {
  #[inline]
  fn from(s: Option<Subscription>) -> Self { s.map_or(Teardown::Empty, Teardown::Subscription) }
}

impl Debug for Teardown {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Teardown::Empty => f.write_str("Teardown::Empty"),
      Teardown::Callback(_) => f.write_str("Teardown::Callback"),
      Teardown::Subscription(s) => f.debug_tuple("Teardown::Subscription").field(s).finish(),
    }
  }
}

/// A composite, shareable cancellation handle.
///
/// Cloning yields another handle to the same subscription. Closing runs every
/// owned teardown exactly once, in the order they were added; teardowns added
/// after the subscription closed run immediately.
#[derive(Clone, Default)]
pub struct Subscription(Rc<RefCell<Inner>>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

impl Subscription {
  pub fn new() -> Self { Self::default() }

  /// A subscription that is closed from the start.
  pub fn closed() -> Self {
    let s = Self::default();
    s.0.borrow_mut().closed = true;
    s
  }

  /// Takes ownership of `teardown`; it runs when this subscription closes.
  pub fn add(&self, teardown: impl Into<Teardown>) {
    let teardown = teardown.into();
    match &teardown {
      Teardown::Empty => return,
      Teardown::Subscription(other) if self.is_same(other) => return,
      _ => {}
    }
    let mut inner = self.0.borrow_mut();
    if inner.closed {
      drop(inner);
      teardown.execute();
    } else {
      inner.teardown.retain(|t| !t.is_closed());
      inner.teardown.push(teardown);
    }
  }

  /// Forgets a child subscription without closing it.
  pub fn remove(&self, child: &Subscription) {
    self
      .0
      .borrow_mut()
      .teardown
      .retain(|t| !matches!(t, Teardown::Subscription(s) if s.is_same(child)));
  }

  /// Number of teardowns currently owned.
  pub fn teardown_size(&self) -> usize { self.0.borrow().teardown.len() }

  /// Activates "RAII" behavior for this subscription: `unsubscribe()` is
  /// called as soon as the returned guard goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  fn is_same(&self, other: &Subscription) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.borrow_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for t in teardown {
      t.execute();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool {
    // A held mutable borrow means we are inside `add` or `unsubscribe` of this
    // very handle; report it as still open.
    self.0.try_borrow().map_or(false, |inner| inner.closed)
  }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscription")
      .field("is_closed", &self.is_closed())
      .field("teardown_count", &self.0.try_borrow().map_or(0, |i| i.teardown.len()))
      .finish()
  }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: Subscription) -> SubscriptionGuard { SubscriptionGuard(subscription) }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;

  #[test]
  fn add_prunes_closed_children() {
    let local = Subscription::default();
    let l1 = Subscription::default();
    let l2 = Subscription::default();
    local.add(l1.clone());
    local.add(l2);
    assert_eq!(local.teardown_size(), 2);
    l1.unsubscribe();
    local.add(Subscription::default());
    assert_eq!(local.teardown_size(), 2);
  }

  #[test]
  fn teardown_runs_once() {
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    let s = Subscription::new();
    s.add(Teardown::from_fn(move || c_hits.set(c_hits.get() + 1)));
    s.unsubscribe();
    s.unsubscribe();
    assert_eq!(hits.get(), 1);
    assert!(s.is_closed());
  }

  #[test]
  fn add_after_close_runs_immediately() {
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    let s = Subscription::closed();
    s.add(Teardown::from_fn(move || c_hits.set(c_hits.get() + 1)));
    assert_eq!(hits.get(), 1);
    let child = Subscription::new();
    s.add(child.clone());
    assert!(child.is_closed());
  }

  #[test]
  fn reentrant_unsubscribe() {
    let s = Subscription::new();
    let c_s = s.clone();
    let hits = Rc::new(Cell::new(0));
    let c_hits = hits.clone();
    s.add(Teardown::from_fn(move || {
      c_s.unsubscribe();
      c_hits.set(c_hits.get() + 1);
    }));
    s.unsubscribe();
    assert_eq!(hits.get(), 1);
  }

  #[test]
  fn nested_children_close_recursively() {
    let root = Subscription::new();
    let mid = Subscription::new();
    let leaf = Subscription::new();
    mid.add(leaf.clone());
    root.add(mid.clone());
    root.add(root.clone());
    root.unsubscribe();
    assert!(mid.is_closed());
    assert!(leaf.is_closed());
  }

  #[test]
  fn remove_keeps_child_open() {
    let root = Subscription::new();
    let child = Subscription::new();
    root.add(child.clone());
    root.remove(&child);
    root.unsubscribe();
    assert!(!child.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let s = Subscription::new();
    {
      let _guard = s.clone().unsubscribe_when_dropped();
    }
    assert!(s.is_closed());
  }
}
