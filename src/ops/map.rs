use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  pub fn map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> U + 'static,
  {
    let func = Rc::new(f);
    Observable::new(move |subscriber: Subscriber<U, Err>| {
      self.subscribe_with(MapObserver { observer: subscriber, func: func.clone() })
    })
  }

  /// Like [`map`](Observable::map), but the closure may fail; an `Err`
  /// result ends the stream with that error.
  pub fn try_map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Result<U, Err> + 'static,
  {
    let func = Rc::new(f);
    Observable::new(move |subscriber: Subscriber<U, Err>| {
      self.subscribe_with(TryMapObserver { observer: subscriber, func: func.clone() })
    })
  }
}

struct MapObserver<U, Err, F> {
  observer: Subscriber<U, Err>,
  func: Rc<F>,
}

impl<Item, U, Err, F> Observer<Item, Err> for MapObserver<U, Err, F>
where
  U: 'static,
  Err: 'static,
  F: Fn(Item) -> U,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  forward_terminals!(observer, Err);
}

struct TryMapObserver<U, Err, F> {
  observer: Subscriber<U, Err>,
  func: Rc<F>,
}

impl<Item, U, Err, F> Observer<Item, Err> for TryMapObserver<U, Err, F>
where
  U: 'static,
  Err: 'static,
  F: Fn(Item) -> Result<U, Err>,
{
  fn next(&mut self, value: Item) {
    match (self.func)(value) {
      Ok(v) => self.observer.next(v),
      Err(e) => self.observer.error(e),
    }
  }

  forward_terminals!(observer, Err);
}

#[cfg(test)]
mod tests {
  use crate::observable::{from_iter, of};
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn primitive_type() {
    let i = Rc::new(RefCell::new(0));
    let c_i = i.clone();
    from_iter::<_, ()>(100..101).map(|v| v * 2).subscribe(move |v| *c_i.borrow_mut() += v);
    assert_eq!(*i.borrow(), 200);
  }

  #[test]
  fn reference_lifetime_should_work() {
    let i = Rc::new(RefCell::new(0));
    let c_i = i.clone();
    of::<_, ()>(100).map(|v| v).subscribe(move |v| *c_i.borrow_mut() += v);
    assert_eq!(*i.borrow(), 100);
  }

  #[test]
  fn map_types_mixed() {
    let i = Rc::new(RefCell::new(0));
    let c_i = i.clone();
    from_iter::<_, ()>(vec!['a', 'b', 'c']).map(|_| 1).subscribe(move |v| *c_i.borrow_mut() += v);
    assert_eq!(*i.borrow(), 3);
  }

  #[test]
  fn try_map_turns_failure_into_error() {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_log, e_log) = (log.clone(), log.clone());
    from_iter::<_, String>(vec!["1", "2", "x", "4"])
      .try_map(|s| s.parse::<i32>().map_err(|e| e.to_string()))
      .subscribe_err(
        move |v| c_log.borrow_mut().push(v.to_string()),
        move |e| e_log.borrow_mut().push(e),
      );
    assert_eq!(*log.borrow(), vec!["1", "2", "invalid digit found in string"]);
  }

  #[test]
  fn benchmark() { do_bench(); }

  bencher::benchmark_group!(do_bench, bench);

  fn bench(b: &mut bencher::Bencher) { b.iter(primitive_type); }
}
