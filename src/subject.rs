//! Multicasting.
//!
//! A [`Subject`] is an observer and an observable at once: whatever it is
//! told through `next`, `error` or `complete` is broadcast to every observer
//! currently subscribed to it.
use crate::{
  error::UsageError,
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike, Teardown},
};

/// A hot, multicast stream that is fed by hand.
///
/// - Values are broadcast to the observers subscribed at the moment of the
///   call, in subscription order. Observers added or removed during a
///   broadcast do not affect it.
/// - After `error` or `complete` the subject is stopped: further values are
///   ignored, and a late subscriber immediately receives the terminal
///   notification (without any of the earlier values).
/// - After [`unsubscribe`](Subject::unsubscribe) the subject is disposed: any
///   further use is a [`UsageError::ObjectUnsubscribed`]. The `try_*` methods
///   return it; the plain methods panic with it.
///
/// Cloning yields another handle to the same subject.
///
/// ```rust
/// use rxmarble::prelude::*;
/// use std::{cell::RefCell, rc::Rc};
///
/// let subject = Subject::<i32, ()>::new();
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// let c_seen = seen.clone();
/// subject.as_observable().subscribe(move |v| c_seen.borrow_mut().push(("a", v)));
/// subject.next(1);
/// let c_seen = seen.clone();
/// subject.as_observable().subscribe(move |v| c_seen.borrow_mut().push(("b", v)));
/// subject.next(2);
///
/// assert_eq!(*seen.borrow(), vec![("a", 1), ("a", 2), ("b", 2)]);
/// ```
pub struct Subject<Item, Err> {
  inner: MutRc<SubjectState<Item, Err>>,
}

struct SubjectState<Item, Err> {
  subscribers: Subscribers<Item, Err>,
  stopped: Option<Terminal<Err>>,
  disposed: bool,
}

#[derive(Clone)]
enum Terminal<Err> {
  Error(Err),
  Complete,
}

/// The observers of a subject, keyed by a per-subject id so a subscription
/// can remove exactly its own entry.
struct Subscribers<Item, Err> {
  next_id: usize,
  list: Vec<(usize, Subscriber<Item, Err>)>,
}

impl<Item, Err> Default for Subscribers<Item, Err> {
  fn default() -> Self { Subscribers { next_id: 0, list: vec![] } }
}

impl<Item, Err> Subscribers<Item, Err> {
  fn add(&mut self, subscriber: Subscriber<Item, Err>) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.list.push((id, subscriber));
    id
  }

  fn remove(&mut self, id: usize) { self.list.retain(|(i, _)| *i != id); }

  fn snapshot(&self) -> Vec<Subscriber<Item, Err>> { self.list.iter().map(|(_, s)| s.clone()).collect() }
}

impl<Item, Err> Clone for Subject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Subject { inner: self.inner.clone() } }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Default for Subject<Item, Err> {
  fn default() -> Self {
    Subject {
      inner: MutRc::own(SubjectState { subscribers: Subscribers::default(), stopped: None, disposed: false }),
    }
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// An observable view of this subject; every subscription to it becomes
  /// one more observer of the subject.
  ///
  /// # Panics
  ///
  /// Subscribing to the view panics once the subject was disposed.
  pub fn as_observable(&self) -> Observable<Item, Err> {
    let subject = self.clone();
    Observable::new(move |subscriber: Subscriber<Item, Err>| match subject.attach(subscriber) {
      Ok(teardown) => teardown,
      Err(err) => panic!("{err}"),
    })
  }

  /// Subscribes `observer` directly, reporting a disposed subject as an error
  /// instead of panicking.
  pub fn try_subscribe_with<O>(&self, observer: O) -> Result<Subscription, UsageError>
  where
    O: Observer<Item, Err> + 'static,
  {
    let subscriber = Subscriber::new(observer);
    let teardown = self.attach(subscriber.clone())?;
    subscriber.add(teardown);
    Ok(subscriber.subscription())
  }

  pub fn try_next(&self, value: Item) -> Result<(), UsageError> {
    let observers = {
      let state = self.inner.rc_deref();
      if state.disposed {
        return Err(used_after_unsubscribe());
      }
      if state.stopped.is_some() {
        return Ok(());
      }
      state.subscribers.snapshot()
    };
    broadcast(observers, value);
    Ok(())
  }

  pub fn try_error(&self, err: Err) -> Result<(), UsageError> {
    let observers = self.stop(Terminal::Error(err.clone()))?;
    for observer in observers {
      observer.error(err.clone());
    }
    Ok(())
  }

  pub fn try_complete(&self) -> Result<(), UsageError> {
    let observers = self.stop(Terminal::Complete)?;
    for observer in observers {
      observer.complete();
    }
    Ok(())
  }

  /// # Panics
  ///
  /// Panics with [`UsageError::ObjectUnsubscribed`] once the subject was
  /// disposed; see [`try_next`](Subject::try_next).
  pub fn next(&self, value: Item) {
    if let Err(err) = self.try_next(value) {
      panic!("{err}");
    }
  }

  /// # Panics
  ///
  /// Panics once the subject was disposed.
  pub fn error(&self, err: Err) {
    if let Err(err) = self.try_error(err) {
      panic!("{err}");
    }
  }

  /// # Panics
  ///
  /// Panics once the subject was disposed.
  pub fn complete(&self) {
    if let Err(err) = self.try_complete() {
      panic!("{err}");
    }
  }

  /// Disposes the subject. Current observers are dropped without any
  /// notification and every later use is a usage error.
  pub fn unsubscribe(&self) {
    let dropped = {
      let mut state = self.inner.rc_deref_mut();
      state.disposed = true;
      std::mem::take(&mut state.subscribers.list)
    };
    drop(dropped);
  }

  /// `true` after `error` or `complete`.
  pub fn is_stopped(&self) -> bool { self.inner.rc_deref().stopped.is_some() }

  /// `true` after [`unsubscribe`](Subject::unsubscribe).
  pub fn is_disposed(&self) -> bool { self.inner.rc_deref().disposed }

  pub fn observer_count(&self) -> usize { self.inner.rc_deref().subscribers.list.len() }

  pub(crate) fn ptr_eq(&self, other: &Self) -> bool { self.inner.ptr_eq(&other.inner) }

  fn attach(&self, subscriber: Subscriber<Item, Err>) -> Result<Teardown, UsageError> {
    let terminal = {
      let mut state = self.inner.rc_deref_mut();
      if state.disposed {
        return Err(used_after_unsubscribe());
      }
      match &state.stopped {
        Some(terminal) => terminal.clone(),
        None => {
          let id = state.subscribers.add(subscriber);
          let weak = self.inner.downgrade();
          return Ok(Teardown::from_fn(move || {
            if let Some(inner) = weak.upgrade() {
              inner.rc_deref_mut().subscribers.remove(id);
            }
          }));
        }
      }
    };
    match terminal {
      Terminal::Error(err) => subscriber.error(err),
      Terminal::Complete => subscriber.complete(),
    }
    Ok(Teardown::Empty)
  }

  fn stop(&self, terminal: Terminal<Err>) -> Result<Vec<Subscriber<Item, Err>>, UsageError> {
    let mut state = self.inner.rc_deref_mut();
    if state.disposed {
      return Err(used_after_unsubscribe());
    }
    if state.stopped.is_some() {
      return Ok(vec![]);
    }
    state.stopped = Some(terminal);
    Ok(std::mem::take(&mut state.subscribers.list).into_iter().map(|(_, s)| s).collect())
  }
}

fn used_after_unsubscribe() -> UsageError {
  tracing::warn!("subject used after unsubscribe");
  UsageError::ObjectUnsubscribed
}

/// Sends `value` to every observer, moving it into the last one.
fn broadcast<Item: Clone + 'static, Err: 'static>(observers: Vec<Subscriber<Item, Err>>, value: Item) {
  let mut iter = observers.into_iter().peekable();
  while let Some(observer) = iter.next() {
    if iter.peek().is_some() {
      observer.next(value.clone());
    } else {
      observer.next(value);
      break;
    }
  }
}

impl<Item: Clone + 'static, Err: Clone + 'static> Observer<Item, Err> for Subject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subject::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subject::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subject::complete(self) }

  #[inline]
  fn is_closed(&self) -> bool { self.is_stopped() }
}

impl<Item: Clone + 'static, Err: Clone + 'static> SubscriptionLike for Subject<Item, Err> {
  #[inline]
  fn unsubscribe(&self) { Subject::unsubscribe(self) }

  #[inline]
  fn is_closed(&self) -> bool { self.is_disposed() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::observable::from_iter;
  use std::{cell::RefCell, rc::Rc};

  type Log = Rc<RefCell<Vec<String>>>;

  fn record(subject: &Subject<i32, &'static str>, name: &'static str, log: &Log) -> Subscription {
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    subject.as_observable().subscribe_all(
      move |v| l1.borrow_mut().push(format!("{name} {v}")),
      move |e| l2.borrow_mut().push(format!("{name} error {e}")),
      move || l3.borrow_mut().push(format!("{name} complete")),
    )
  }

  #[test]
  fn base_data_flow() {
    let subject = Subject::new();
    let log = Log::default();
    record(&subject, "a", &log);
    record(&subject, "b", &log);
    subject.next(1);
    subject.complete();
    assert_eq!(*log.borrow(), vec!["a 1", "b 1", "a complete", "b complete"]);
  }

  #[test]
  fn late_subscriber_gets_terminal_only() {
    let subject = Subject::new();
    subject.next(1);
    subject.error("bad");
    subject.next(2);
    let log = Log::default();
    record(&subject, "late", &log);
    assert_eq!(*log.borrow(), vec!["late error bad"]);
    assert_eq!(subject.observer_count(), 0);
  }

  #[test]
  fn unsubscribed_observer_is_removed() {
    let subject = Subject::new();
    let log = Log::default();
    let a = record(&subject, "a", &log);
    record(&subject, "b", &log);
    a.unsubscribe();
    subject.next(1);
    assert_eq!(*log.borrow(), vec!["b 1"]);
    assert_eq!(subject.observer_count(), 1);
  }

  #[test]
  fn unsubscribe_during_broadcast_is_respected() {
    let subject = Subject::<i32, ()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::default();
    let c_victim = victim.clone();
    let c_log = log.clone();
    subject.as_observable().subscribe(move |v| {
      c_log.borrow_mut().push(("first", v));
      if let Some(s) = c_victim.borrow().as_ref() {
        s.unsubscribe();
      }
    });
    let c_log = log.clone();
    *victim.borrow_mut() = Some(subject.as_observable().subscribe(move |v| c_log.borrow_mut().push(("second", v))));
    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), vec![("first", 1), ("first", 2)]);
  }

  #[test]
  fn subscribe_during_broadcast_waits_for_next_value() {
    let subject = Subject::<i32, ()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_subject = subject.clone();
    let c_log = log.clone();
    subject.as_observable().take(1).subscribe(move |_| {
      let c_log = c_log.clone();
      c_subject.as_observable().subscribe(move |v| c_log.borrow_mut().push(v));
    });
    subject.next(1);
    subject.next(2);
    assert_eq!(*log.borrow(), vec![2]);
  }

  #[test]
  fn disposed_subject_reports_usage_error() {
    let subject = Subject::<i32, ()>::new();
    subject.complete();
    assert_eq!(subject.try_next(1), Ok(()));
    subject.unsubscribe();
    assert!(subject.is_disposed());
    assert_eq!(subject.try_next(1), Err(UsageError::ObjectUnsubscribed));
    assert_eq!(subject.try_complete(), Err(UsageError::ObjectUnsubscribed));
    assert_eq!(
      subject.try_subscribe_with(crate::observer::FnObserver::new(|_: i32| {}, |_: ()| {}, || {})).err(),
      Some(UsageError::ObjectUnsubscribed)
    );
  }

  #[test]
  #[should_panic(expected = "object unsubscribed")]
  fn next_after_unsubscribe_panics() {
    let subject = Subject::<i32, ()>::new();
    subject.unsubscribe();
    subject.next(1);
  }

  #[test]
  fn bridges_a_cold_source() {
    let subject = Subject::new();
    let log = Log::default();
    record(&subject, "a", &log);
    record(&subject, "b", &log);
    from_iter(vec![7]).subscribe_with(subject.clone());
    assert_eq!(*log.borrow(), vec!["a 7", "b 7", "a complete", "b complete"]);
  }
}
