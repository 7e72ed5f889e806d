use std::rc::Rc;

use crate::{observable::Observable, observer::Observer, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Folds every value into an accumulator starting at `initial` and emits
  /// each intermediate accumulator. Every subscription starts from `initial`.
  pub fn scan<Acc, F>(self, initial: Acc, binary_op: F) -> Observable<Acc, Err>
  where
    Acc: Clone + 'static,
    F: Fn(Acc, Item) -> Acc + 'static,
  {
    let binary_op = Rc::new(binary_op);
    Observable::new(move |subscriber: Subscriber<Acc, Err>| {
      self.subscribe_with(ScanObserver {
        observer: subscriber,
        binary_op: binary_op.clone(),
        acc: Some(initial.clone()),
      })
    })
  }
}

struct ScanObserver<Acc, Err, F> {
  observer: Subscriber<Acc, Err>,
  binary_op: Rc<F>,
  acc: Option<Acc>,
}

impl<Item, Acc, Err, F> Observer<Item, Err> for ScanObserver<Acc, Err, F>
where
  Acc: Clone + 'static,
  Err: 'static,
  F: Fn(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.binary_op)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  forward_terminals!(observer, Err);
}

#[cfg(test)]
mod tests {
  use crate::observable::from_iter;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn scan_initial() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let c_emitted = emitted.clone();
    from_iter::<_, ()>(vec![1, 1, 1, 1, 1])
      .scan(100, |acc, v| acc + v)
      .subscribe(move |v| c_emitted.borrow_mut().push(v));
    assert_eq!(*emitted.borrow(), vec![101, 102, 103, 104, 105]);
  }

  #[test]
  fn each_subscription_restarts_from_seed() {
    let emitted = Rc::new(RefCell::new(vec![]));
    let counted = from_iter::<_, ()>(vec!['a', 'b']).scan(0, |acc, _| acc + 1);
    for _ in 0..2 {
      let c_emitted = emitted.clone();
      counted.subscribe(move |v| c_emitted.borrow_mut().push(v));
    }
    assert_eq!(*emitted.borrow(), vec![1, 2, 1, 2]);
  }
}
