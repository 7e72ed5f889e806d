use crate::{
  observable::Observable,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Creates an observable that emits every element of `iter`, then completes,
/// all synchronously inside the subscribe call.
///
/// `iter` is cloned for each subscription, so every subscriber sees the whole
/// sequence. Emission stops early once the subscriber is closed, which makes
/// unbounded iterators usable behind `take`.
///
/// ```
/// use rxmarble::prelude::*;
///
/// let letters: Observable<char, ()> = observable::from_iter("abc".chars());
/// letters.subscribe(|c| println!("{c}"));
/// ```
pub fn from_iter<I, Err>(iter: I) -> Observable<I::Item, Err>
where
  I: IntoIterator + Clone + 'static,
  I::Item: 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<I::Item, Err>| {
    for v in iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  })
}

/// Like [`from_iter`], but every element (and the completion) is emitted from
/// its own task on `scheduler`.
pub fn scheduled<I, Err, S>(iter: I, scheduler: S) -> Observable<I::Item, Err>
where
  I: IntoIterator + Clone + 'static,
  I::IntoIter: 'static,
  I::Item: 'static,
  Err: 'static,
  S: Scheduler,
{
  Observable::new(move |subscriber: Subscriber<I::Item, Err>| {
    let handle = Subscription::new();
    schedule_next(iter.clone().into_iter(), subscriber, scheduler.clone(), handle.clone());
    handle
  })
}

fn schedule_next<It, Err, S>(iter: It, subscriber: Subscriber<It::Item, Err>, scheduler: S, handle: Subscription)
where
  It: Iterator + 'static,
  It::Item: 'static,
  Err: 'static,
  S: Scheduler,
{
  if handle.is_closed() {
    return;
  }
  let c_scheduler = scheduler.clone();
  let c_handle = handle.clone();
  let task = scheduler.schedule(None, move || {
    let mut iter = iter;
    match iter.next() {
      Some(v) => {
        subscriber.next(v);
        if !subscriber.is_closed() {
          schedule_next(iter, subscriber, c_scheduler, c_handle);
        }
      }
      None => subscriber.complete(),
    }
  });
  handle.add(task);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scheduler::VirtualScheduler;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn emits_in_order_then_completes() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    from_iter::<_, ()>(vec![1, 2, 3]).subscribe_complete(
      move |v| l1.borrow_mut().push(v),
      move || l2.borrow_mut().push(0),
    );
    assert_eq!(*log.borrow(), vec![1, 2, 3, 0]);
  }

  #[test]
  fn unbounded_iterator_stops_when_closed() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    from_iter::<_, ()>(0..).take(3).subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![0, 1, 2]);
  }

  #[test]
  fn string_characters() {
    let out = Rc::new(RefCell::new(String::new()));
    let c_out = out.clone();
    from_iter::<_, ()>("hello".chars()).subscribe(move |c| c_out.borrow_mut().push(c));
    assert_eq!(*out.borrow(), "hello");
  }

  #[test]
  fn scheduled_emits_one_per_task() {
    let scheduler = VirtualScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    scheduled::<_, (), _>(vec![1, 2], scheduler.clone()).subscribe_complete(
      move |v| l1.borrow_mut().push(v),
      move || l2.borrow_mut().push(0),
    );
    assert!(log.borrow().is_empty());
    assert_eq!(scheduler.pending_count(), 1);
    scheduler.flush();
    assert_eq!(*log.borrow(), vec![1, 2, 0]);
  }

  #[test]
  fn scheduled_cancelled_by_unsubscribe() {
    let scheduler = VirtualScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let subscription =
      scheduled::<_, (), _>(vec![1, 2], scheduler.clone()).subscribe(move |v| c_log.borrow_mut().push(v));
    subscription.unsubscribe();
    scheduler.flush();
    assert!(log.borrow().is_empty());
  }
}
