use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

/// Combines the latest values of `a` and `b` with `binary_op`.
///
/// Nothing is emitted until both sources produced a value; from then on every
/// value of either source yields one output. Completes once both completed,
/// so a source that never completes keeps the result open forever. This holds
/// even when the other source completed without a value and no output can
/// follow anymore.
///
/// ```
/// use rxmarble::prelude::*;
///
/// let a = observable::of::<_, ()>(1);
/// let b = observable::from_iter(vec![10, 20]);
/// observable::combine_latest(a, b, |a, b| a + b).subscribe(|v| println!("{v}"));
/// ```
pub fn combine_latest<A, B, Out, Err, F>(a: Observable<A, Err>, b: Observable<B, Err>, binary_op: F) -> Observable<Out, Err>
where
  A: Clone + 'static,
  B: Clone + 'static,
  Out: 'static,
  Err: 'static,
  F: Fn(A, B) -> Out + 'static,
{
  let binary_op: Rc<dyn Fn(A, B) -> Out> = Rc::new(binary_op);
  Observable::new(move |subscriber: Subscriber<Out, Err>| {
    let state = MutRc::own(CombineLatestState { a: None, b: None, completed: 0 });
    let shared = CombineShared { state, subscriber: subscriber.clone(), binary_op: binary_op.clone() };
    subscriber.add(a.subscribe_with(AObserver(shared.clone())));
    subscriber.add(b.subscribe_with(BObserver(shared)));
  })
}

/// Combines the latest value of every source into a `Vec`, in source order.
///
/// Completes once every source completed, like [`combine_latest`]. An empty
/// list completes immediately.
pub fn combine_latest_all<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<Vec<Item>, Err>| {
    if sources.is_empty() {
      subscriber.complete();
      return;
    }
    let state = MutRc::own(LatestValues { values: vec![None; sources.len()], completed: 0 });
    for (index, source) in sources.iter().enumerate() {
      let observer = IndexedObserver { index, state: state.clone(), subscriber: subscriber.clone() };
      subscriber.add(source.subscribe_with(observer));
    }
  })
}

impl<A: Clone + 'static, Err: 'static> Observable<A, Err> {
  /// Instance form of [`combine_latest`].
  pub fn combine_latest_with<B, Out, F>(self, other: Observable<B, Err>, binary_op: F) -> Observable<Out, Err>
  where
    B: Clone + 'static,
    Out: 'static,
    F: Fn(A, B) -> Out + 'static,
  {
    combine_latest(self, other, binary_op)
  }
}

struct CombineLatestState<A, B> {
  a: Option<A>,
  b: Option<B>,
  completed: usize,
}

enum CombineItem<A, B> {
  ItemA(A),
  ItemB(B),
}

struct CombineShared<A, B, Out, Err> {
  state: MutRc<CombineLatestState<A, B>>,
  subscriber: Subscriber<Out, Err>,
  binary_op: Rc<dyn Fn(A, B) -> Out>,
}

impl<A, B, Out, Err> Clone for CombineShared<A, B, Out, Err> {
  fn clone(&self) -> Self {
    CombineShared {
      state: self.state.clone(),
      subscriber: self.subscriber.clone(),
      binary_op: self.binary_op.clone(),
    }
  }
}

impl<A: Clone + 'static, B: Clone + 'static, Out: 'static, Err: 'static> CombineShared<A, B, Out, Err> {
  fn next(&self, value: CombineItem<A, B>) {
    let pair = {
      let mut state = self.state.rc_deref_mut();
      match value {
        CombineItem::ItemA(v) => state.a = Some(v),
        CombineItem::ItemB(v) => state.b = Some(v),
      }
      state.a.clone().zip(state.b.clone())
    };
    if let Some((a, b)) = pair {
      self.subscriber.next((self.binary_op)(a, b));
    }
  }

  fn complete(&self) {
    let all_done = {
      let mut state = self.state.rc_deref_mut();
      state.completed += 1;
      state.completed == 2
    };
    if all_done {
      self.subscriber.complete();
    }
  }
}

struct AObserver<A, B, Out, Err>(CombineShared<A, B, Out, Err>);

impl<A, B, Out, Err> Observer<A, Err> for AObserver<A, B, Out, Err>
where
  A: Clone + 'static,
  B: Clone + 'static,
  Out: 'static,
  Err: 'static,
{
  #[inline]
  fn next(&mut self, value: A) { self.0.next(CombineItem::ItemA(value)) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.subscriber.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.subscriber.is_closed() }
}

struct BObserver<A, B, Out, Err>(CombineShared<A, B, Out, Err>);

impl<A, B, Out, Err> Observer<B, Err> for BObserver<A, B, Out, Err>
where
  A: Clone + 'static,
  B: Clone + 'static,
  Out: 'static,
  Err: 'static,
{
  #[inline]
  fn next(&mut self, value: B) { self.0.next(CombineItem::ItemB(value)) }

  #[inline]
  fn error(&mut self, err: Err) { self.0.subscriber.error(err) }

  #[inline]
  fn complete(&mut self) { self.0.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.subscriber.is_closed() }
}

struct LatestValues<Item> {
  values: Vec<Option<Item>>,
  completed: usize,
}

struct IndexedObserver<Item, Err> {
  index: usize,
  state: MutRc<LatestValues<Item>>,
  subscriber: Subscriber<Vec<Item>, Err>,
}

impl<Item: Clone + 'static, Err: 'static> Observer<Item, Err> for IndexedObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let combined = {
      let mut state = self.state.rc_deref_mut();
      state.values[self.index] = Some(value);
      state.values.iter().cloned().collect::<Option<Vec<_>>>()
    };
    if let Some(combined) = combined {
      self.subscriber.next(combined);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let all_done = {
      let mut state = self.state.rc_deref_mut();
      state.completed += 1;
      state.completed == state.values.len()
    };
    if all_done {
      self.subscriber.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.subscriber.is_closed() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    observable::{empty, from_iter, never, of, timer_periodic},
    scheduler::{Scheduler, VirtualScheduler},
    subject::Subject,
  };
  use std::{cell::RefCell, time::Duration};

  #[test]
  fn waits_for_both_then_emits_on_each() {
    let a = Subject::<i32, ()>::new();
    let b = Subject::<&str, ()>::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    combine_latest(a.as_observable(), b.as_observable(), |n, s| format!("{n}{s}"))
      .subscribe_complete(move |v| c_log.borrow_mut().push(v), move || *c_done.borrow_mut() = true);
    a.next(1);
    a.next(2);
    b.next("x");
    a.next(3);
    b.next("y");
    a.complete();
    assert!(!*done.borrow());
    b.complete();
    assert_eq!(*log.borrow(), vec!["2x", "3x", "3y"]);
    assert!(*done.borrow());
  }

  #[test]
  fn periodic_sources_first_emit_once_both_ticked() {
    let scheduler = VirtualScheduler::new();
    let ms = Duration::from_millis;
    let a = timer_periodic::<(), _>(ms(1000), ms(1000), scheduler.clone());
    let b = timer_periodic::<(), _>(ms(500), ms(2000), scheduler.clone());
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let c_scheduler = scheduler.clone();
    let subscription = a
      .combine_latest_with(b, |a, b| (a, b))
      .subscribe(move |v| c_log.borrow_mut().push((c_scheduler.now(), v)));
    scheduler.advance_to(ms(8300));
    crate::subscription::SubscriptionLike::unsubscribe(&subscription);
    let log = log.borrow();
    assert_eq!(log.len(), 11);
    assert_eq!(log[0], (ms(1000), (0, 0)));
    assert_eq!(log[10].1, (7, 3));
  }

  #[test]
  fn all_form_collects_in_source_order() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    combine_latest_all(vec![of::<_, ()>(1), from_iter(vec![2, 3])]).subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![vec![1, 2], vec![1, 3]]);
  }

  #[test]
  fn all_form_empty_completes() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    combine_latest_all::<i32, ()>(vec![]).subscribe_complete(|_| {}, move || *c_done.borrow_mut() = true);
    assert!(*done.borrow());
  }

  #[test]
  fn empty_source_waits_for_the_other_to_complete() {
    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let other = Subject::<i32, ()>::new();
    combine_latest(empty::<i32, ()>(), other.as_observable(), |a, b| a + b)
      .subscribe_complete(|_| unreachable!(), move || *c_done.borrow_mut() = true);
    other.next(1);
    assert!(!*done.borrow());
    other.complete();
    assert!(*done.borrow());

    let done = Rc::new(RefCell::new(false));
    let c_done = done.clone();
    let subscription = combine_latest(empty::<i32, ()>(), never::<i32, ()>(), |a, b| a + b)
      .subscribe_complete(|_| unreachable!(), move || *c_done.borrow_mut() = true);
    assert!(!*done.borrow());
    crate::subscription::SubscriptionLike::unsubscribe(&subscription);
  }
}
