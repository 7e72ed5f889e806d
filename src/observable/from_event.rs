use std::rc::Rc;

use crate::{
  observable::Observable,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::Teardown,
};

/// A registered event callback. Listeners are identified by pointer, so the
/// same `Rc` has to be handed back to remove it.
pub type Listener<Event> = Rc<dyn Fn(Event)>;

/// Anything that accepts named event listeners.
pub trait EventTarget<Event> {
  fn add_listener(&self, event: &str, listener: Listener<Event>);

  fn remove_listener(&self, event: &str, listener: &Listener<Event>);
}

/// Creates an observable of the `event` events fired by `target`.
///
/// Each subscription registers its own listener and removes it again on
/// unsubscription. The stream never completes on its own.
pub fn from_event<T, Event, Err>(target: T, event: impl Into<String>) -> Observable<Event, Err>
where
  T: EventTarget<Event> + 'static,
  Event: 'static,
  Err: 'static,
{
  let target = Rc::new(target);
  let event: Rc<str> = event.into().into();
  Observable::new(move |subscriber: Subscriber<Event, Err>| {
    let listener: Listener<Event> = Rc::new(move |e: Event| subscriber.next(e));
    target.add_listener(&event, listener.clone());
    let target = target.clone();
    let event = event.clone();
    Teardown::from_fn(move || target.remove_listener(&event, &listener))
  })
}

/// A minimal in-process event target.
pub struct EventEmitter<Event> {
  listeners: MutRc<Vec<(String, Listener<Event>)>>,
}

impl<Event> Clone for EventEmitter<Event> {
  fn clone(&self) -> Self { EventEmitter { listeners: self.listeners.clone() } }
}

impl<Event> Default for EventEmitter<Event> {
  fn default() -> Self { EventEmitter { listeners: MutRc::own(vec![]) } }
}

impl<Event: Clone> EventEmitter<Event> {
  pub fn new() -> Self { Self::default() }

  /// Calls every listener registered for `name` at the time of the call.
  pub fn emit(&self, name: &str, event: Event) {
    let listeners: Vec<_> = self
      .listeners
      .rc_deref()
      .iter()
      .filter(|(n, _)| n == name)
      .map(|(_, l)| l.clone())
      .collect();
    for listener in listeners {
      listener(event.clone());
    }
  }

  pub fn listener_count(&self, name: &str) -> usize {
    self.listeners.rc_deref().iter().filter(|(n, _)| n == name).count()
  }
}

impl<Event> EventTarget<Event> for EventEmitter<Event> {
  fn add_listener(&self, event: &str, listener: Listener<Event>) {
    self.listeners.rc_deref_mut().push((event.to_string(), listener));
  }

  fn remove_listener(&self, event: &str, listener: &Listener<Event>) {
    let mut listeners = self.listeners.rc_deref_mut();
    if let Some(idx) = listeners.iter().position(|(n, l)| n == event && Rc::ptr_eq(l, listener)) {
      listeners.remove(idx);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::subscription::SubscriptionLike;
  use std::cell::RefCell;

  #[test]
  fn forwards_events_until_unsubscribed() {
    let emitter = EventEmitter::<i32>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let clicks: Observable<i32, ()> = from_event(emitter.clone(), "click");
    assert_eq!(emitter.listener_count("click"), 0);
    let subscription = clicks.subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(emitter.listener_count("click"), 1);
    emitter.emit("click", 1);
    emitter.emit("keyup", 9);
    emitter.emit("click", 2);
    subscription.unsubscribe();
    emitter.emit("click", 3);
    assert_eq!(*log.borrow(), vec![1, 2]);
    assert_eq!(emitter.listener_count("click"), 0);
  }

  #[test]
  fn each_subscription_has_its_own_listener() {
    let emitter = EventEmitter::<&str>::new();
    let clicks: Observable<&str, ()> = from_event(emitter.clone(), "click");
    let a = clicks.subscribe(|_| {});
    let b = clicks.subscribe(|_| {});
    assert_eq!(emitter.listener_count("click"), 2);
    a.unsubscribe();
    assert_eq!(emitter.listener_count("click"), 1);
    b.unsubscribe();
    assert_eq!(emitter.listener_count("click"), 0);
  }
}
