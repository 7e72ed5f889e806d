use std::{cell::RefCell, rc::Rc};

use proptest::prelude::*;
use rxmarble::{
  marble::{parse_marbles, render_marbles, TestScheduler},
  notification::Notification,
  observable::{concat, from_iter},
  prelude::*,
};

/// Canonical diagrams: idle frames followed by a value or a group of values,
/// optionally closed by `|` or `#`, without trailing idle frames.
fn diagram() -> impl Strategy<Value = String> {
  let event = prop_oneof![
    "[a-e]",
    prop::collection::vec("[a-e]", 2..4).prop_map(|vs| format!("({})", vs.concat())),
  ];
  let segment = (0usize..4, event).prop_map(|(idle, event)| format!("{}{}", "-".repeat(idle), event));
  let terminal = prop_oneof![
    Just(String::new()),
    (0usize..3).prop_map(|idle| format!("{}|", "-".repeat(idle))),
    Just("#".to_string()),
  ];
  (prop::collection::vec(segment, 0..8), terminal).prop_map(|(segments, terminal)| segments.concat() + &terminal)
}

proptest! {
  #[test]
  fn sequence_is_delivered_in_order_then_completes(values in prop::collection::vec(any::<i32>(), 0..50)) {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_log, d_log) = (log.clone(), log.clone());
    let subscription = from_iter::<_, ()>(values.clone()).subscribe_complete(
      move |v| c_log.borrow_mut().push(Notification::Next(v)),
      move || d_log.borrow_mut().push(Notification::Complete),
    );

    let mut expected: Vec<Notification<i32, ()>> = values.into_iter().map(Notification::Next).collect();
    expected.push(Notification::Complete);
    prop_assert_eq!(&*log.borrow(), &expected);
    prop_assert!(subscription.is_closed());
    subscription.unsubscribe();
    prop_assert_eq!(log.borrow().len(), expected.len());
  }

  #[test]
  fn concat_never_starts_the_second_before_the_first_completes(
    a in prop::collection::vec(0..100i32, 0..20),
    b in prop::collection::vec(100..200i32, 0..20),
  ) {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let first = from_iter::<_, ()>(a.clone());
    let second = from_iter::<_, ()>(b.clone());
    concat([first, second]).subscribe(move |v| c_log.borrow_mut().push(v));
    let expected: Vec<i32> = a.into_iter().chain(b).collect();
    prop_assert_eq!(&*log.borrow(), &expected);
  }

  #[test]
  fn canonical_diagrams_render_back_to_themselves(marbles in diagram()) {
    let messages = parse_marbles::<char, (), _>(&marbles, &CharValues, Some(())).unwrap();
    prop_assert_eq!(render_marbles(&messages, &CharValues), marbles);
  }

  #[test]
  fn cold_observable_replays_its_own_diagram(marbles in diagram()) {
    TestScheduler::new().run(|ts| {
      let source = ts.cold_with_error(&marbles, &CharValues, ());
      ts.expect_observable(source.observable()).to_be_with_error(&marbles, &CharValues, ());
    });
  }
}
