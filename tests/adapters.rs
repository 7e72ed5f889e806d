mod common;

use std::{cell::RefCell, rc::Rc, time::Duration};

use common::init_test_logging;
use rxmarble::{
  observable::{from_event, from_promise, EventEmitter, Promise},
  prelude::*,
};

type Log = Rc<RefCell<Vec<String>>>;

fn record<Item: std::fmt::Debug + 'static, Err: std::fmt::Debug + 'static>(
  source: &Observable<Item, Err>, log: &Log,
) -> Subscription {
  let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
  source.subscribe_all(
    move |v| l1.borrow_mut().push(format!("next {v:?}")),
    move |e| l2.borrow_mut().push(format!("error {e:?}")),
    move || l3.borrow_mut().push("complete".into()),
  )
}

#[test]
fn promise_outcome_reaches_early_and_late_subscribers() {
  init_test_logging();
  let promise = Promise::<i32, String>::pending();
  let source = from_promise(promise.clone());
  let early = Log::default();
  record(&source, &early);
  promise.resolve(42);

  let late = Log::default();
  record(&source, &late);
  assert_eq!(*early.borrow(), vec!["next 42", "complete"]);
  assert_eq!(*late.borrow(), *early.borrow());
}

#[test]
fn rejected_promise_errors() {
  init_test_logging();
  let log = Log::default();
  record(&from_promise(Promise::<i32, &str>::rejected("denied")), &log);
  assert_eq!(*log.borrow(), vec!["error \"denied\""]);
}

#[test]
fn event_listener_lives_as_long_as_the_subscription() {
  init_test_logging();
  let emitter = EventEmitter::<u32>::new();
  let clicks = from_event::<_, _, ()>(emitter.clone(), "click");
  let log = Log::default();
  let subscription = record(&clicks, &log);
  let other = record(&clicks, &Log::default());
  assert_eq!(emitter.listener_count("click"), 2);

  emitter.emit("click", 1);
  emitter.emit("scroll", 9);
  emitter.emit("click", 2);
  subscription.unsubscribe();
  emitter.emit("click", 3);

  assert_eq!(*log.borrow(), vec!["next 1", "next 2"]);
  assert_eq!(emitter.listener_count("click"), 1);
  other.unsubscribe();
  assert_eq!(emitter.listener_count("click"), 0);
}

#[test]
fn events_feed_operators_and_subjects() {
  init_test_logging();
  let emitter = EventEmitter::<i32>::new();
  let subject = Subject::<i32, ()>::new();
  let log = Log::default();
  record(&subject.as_observable(), &log);
  from_event(emitter.clone(), "value").filter(|v| *v > 0).subscribe_with(subject.clone());

  for v in [3, -1, 4] {
    emitter.emit("value", v);
  }
  assert_eq!(*log.borrow(), vec!["next 3", "next 4"]);
}

#[test]
fn virtual_scheduler_orders_by_time_then_insertion() {
  init_test_logging();
  let scheduler = VirtualScheduler::new();
  let log = Rc::new(RefCell::new(vec![]));
  for (name, delay) in [("late", 5), ("first", 1), ("second", 1), ("now", 0)] {
    let c_log = log.clone();
    scheduler.schedule(Some(Duration::from_millis(delay)), move || c_log.borrow_mut().push(name));
  }
  let cancelled = scheduler.schedule(Some(Duration::from_millis(3)), || unreachable!());
  cancelled.unsubscribe();

  scheduler.advance_by(Duration::from_millis(1));
  assert_eq!(*log.borrow(), vec!["now", "first", "second"]);
  scheduler.flush();
  assert_eq!(*log.borrow(), vec!["now", "first", "second", "late"]);
  assert_eq!(scheduler.now(), Duration::from_millis(5));
  assert!(scheduler.is_empty());
}

#[test]
fn separate_virtual_schedulers_are_independent() {
  let a = VirtualScheduler::new();
  let b = VirtualScheduler::new();
  let hits = Rc::new(RefCell::new(0));
  let c_hits = hits.clone();
  observable::timer::<(), _>(Duration::from_millis(2), a.clone()).subscribe(move |_| *c_hits.borrow_mut() += 1);
  b.advance_by(Duration::from_millis(10));
  assert_eq!(*hits.borrow(), 0);
  a.advance_by(Duration::from_millis(2));
  assert_eq!(*hits.borrow(), 1);
}

#[test]
fn immediate_scheduler_trampolines_nested_work() {
  let log = Rc::new(RefCell::new(vec![]));
  let c_log = log.clone();
  ImmediateScheduler.schedule(None, move || {
    let inner_log = c_log.clone();
    ImmediateScheduler.schedule(None, move || inner_log.borrow_mut().push("inner"));
    c_log.borrow_mut().push("outer");
  });
  assert_eq!(*log.borrow(), vec!["outer", "inner"]);
}

#[test]
fn periodic_sources_behave_the_same_on_each_scheduler() {
  fn ticks<S: Scheduler>(scheduler: S) -> Observable<usize, ()> {
    observable::timer_periodic(Duration::ZERO, Duration::from_millis(1), scheduler).map(|v| v * 10).take(3)
  }

  let immediate = Log::default();
  record(&ticks(ImmediateScheduler), &immediate);

  let virtual_time = VirtualScheduler::new();
  let virtual_log = Log::default();
  record(&ticks(virtual_time.clone()), &virtual_log);
  virtual_time.flush();

  assert_eq!(*immediate.borrow(), vec!["next 0", "next 10", "next 20", "complete"]);
  assert_eq!(*virtual_log.borrow(), *immediate.borrow());
  assert!(virtual_time.is_empty());
}

#[test]
fn immediate_interval_with_take_completes() {
  init_test_logging();
  let log = Log::default();
  let subscription = record(&observable::interval::<(), _>(Duration::ZERO, ImmediateScheduler).take(3), &log);
  assert_eq!(*log.borrow(), vec!["next 0", "next 1", "next 2", "complete"]);
  assert!(subscription.is_closed());
}

#[cfg(feature = "futures-scheduler")]
#[test]
fn deferred_scheduler_runs_after_the_current_stack() {
  use rxmarble::observable::from_future;

  init_test_logging();
  let numbers = Log::default();
  let answer = Log::default();
  record(&observable::scheduled::<_, (), _>(vec![1, 2], DeferredScheduler), &numbers);
  record(&from_future(async { Ok::<_, ()>("ready") }), &answer);
  assert!(numbers.borrow().is_empty());
  assert!(answer.borrow().is_empty());

  DeferredScheduler::run();
  assert_eq!(*numbers.borrow(), vec!["next 1", "next 2", "complete"]);
  assert_eq!(*answer.borrow(), vec!["next \"ready\"", "complete"]);
}
