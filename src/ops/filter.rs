use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Emits only the values for which `filter` returns `true`.
  pub fn filter<F>(self, filter: F) -> Observable<Item, Err>
  where
    F: Fn(&Item) -> bool + 'static,
  {
    let filter = Rc::new(filter);
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      self.subscribe_with(FilterObserver { observer: subscriber, filter: filter.clone() })
    })
  }
}

struct FilterObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  filter: Rc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<Item, Err, F>
where
  Item: 'static,
  Err: 'static,
  F: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.filter)(&value) {
      self.observer.next(value)
    }
  }

  forward_terminals!(observer, Err);
}

#[cfg(test)]
mod tests {
  use crate::observable::from_iter;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn fork_and_shared() {
    let log = Rc::new(RefCell::new(vec![]));
    let filtered = from_iter::<_, ()>(0..10).filter(|v| v % 3 == 0);
    let c_log = log.clone();
    filtered.subscribe(move |v| c_log.borrow_mut().push(v));
    let c_log = log.clone();
    filtered.subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![0, 3, 6, 9, 0, 3, 6, 9]);
  }

  #[test]
  fn benchmark() { do_bench(); }

  bencher::benchmark_group!(do_bench, bench);

  fn bench(b: &mut bencher::Bencher) { b.iter(fork_and_shared); }
}
