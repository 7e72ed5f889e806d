//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

// ============================================================================
// Observer Trait
// ============================================================================

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. At most one of `error` / `complete` is ever delivered to an
/// observer that sits behind a [`Subscriber`](crate::subscriber::Subscriber).
pub trait Observer<Item, Err> {
  /// Receive the next value from the observable
  fn next(&mut self, value: Item);

  /// Handle an error from the observable; no value follows it.
  fn error(&mut self, err: Err);

  /// Handle completion of the observable; no value follows it.
  fn complete(&mut self);

  /// Checks if the observer is closed.
  ///
  /// This is primarily used by sources (like `from_iter`) to determine
  /// if they should stop emitting values early (e.g., due to a `take`
  /// operator).
  fn is_closed(&self) -> bool { false }
}

impl<Item, Err, O> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

pub type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err>>;

// ============================================================================
// Closure observer
// ============================================================================

/// An observer assembled from three functions.
///
/// Both subscribe styles, an object implementing [`Observer`] or positional
/// callbacks, end up as an `Observer` inside a
/// [`Subscriber`](crate::subscriber::Subscriber); this type covers the second.
pub struct FnObserver<N, E, C> {
  next: N,
  error: Option<E>,
  complete: Option<C>,
}

impl<N, E, C> FnObserver<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self {
    FnObserver { next, error: Some(error), complete: Some(complete) }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for FnObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  fn error(&mut self, err: Err) {
    self.complete = None;
    if let Some(error) = self.error.take() {
      error(err)
    }
  }

  fn complete(&mut self) {
    self.error = None;
    if let Some(complete) = self.complete.take() {
      complete()
    }
  }

  fn is_closed(&self) -> bool { self.error.is_none() && self.complete.is_none() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn fn_observer_terminal_once() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    let mut observer = FnObserver::new(
      move |v: i32| l1.borrow_mut().push(format!("next {v}")),
      move |e: &str| l2.borrow_mut().push(format!("error {e}")),
      move || l3.borrow_mut().push("complete".to_string()),
    );
    Observer::<i32, &str>::next(&mut observer, 1);
    assert!(!Observer::<i32, &str>::is_closed(&observer));
    Observer::<i32, &str>::complete(&mut observer);
    Observer::<i32, &str>::error(&mut observer, "late");
    assert!(Observer::<i32, &str>::is_closed(&observer));
    assert_eq!(*log.borrow(), vec!["next 1", "complete"]);
  }

  #[test]
  fn boxed_observer_forwards() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let mut boxed: BoxedObserver<i32, ()> =
      Box::new(FnObserver::new(move |v| c_log.borrow_mut().push(v), |_| {}, || {}));
    boxed.next(7);
    boxed.complete();
    assert!(boxed.is_closed());
    assert_eq!(*log.borrow(), vec![7]);
  }
}
