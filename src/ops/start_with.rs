use crate::observable::{concat, from_iter, Observable};

impl<Item: Clone + 'static, Err: 'static> Observable<Item, Err> {
  /// Emits `values` before the values of this stream.
  pub fn start_with(self, values: Vec<Item>) -> Observable<Item, Err> { concat([from_iter(values), self]) }

  /// Emits `values` after this stream completed.
  pub fn end_with(self, values: Vec<Item>) -> Observable<Item, Err> { concat([self, from_iter(values)]) }
}

#[cfg(test)]
mod tests {
  use crate::observable::of;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn wraps_the_source() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    of::<_, ()>(3)
      .start_with(vec![1, 2])
      .end_with(vec![4])
      .subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec![1, 2, 3, 4]);
  }
}
