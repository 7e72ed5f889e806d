use crate::{observable::Observable, subscriber::Subscriber};

/// Creates an observable producing a multiple values.
///
/// Completes immediately after emitting the values given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxmarble::{of_sequence, prelude::*};
///
/// let source: Observable<i32, ()> = of_sequence!(1, 2, 3);
/// source.subscribe(|v| println!("{},", v));
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of_sequence {
  ( $( $item:expr ),* $(,)? ) => {
    $crate::observable::from_iter(vec![$( $item ),*])
  };
}

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// ```
/// use rxmarble::prelude::*;
///
/// let source: Observable<i32, ()> = observable::of(123);
/// source.subscribe(|v| println!("{},", v));
/// ```
pub fn of<Item, Err>(value: Item) -> Observable<Item, Err>
where
  Item: Clone + 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<Item, Err>| {
    subscriber.next(value.clone());
    subscriber.complete();
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{cell::RefCell, rc::Rc};

  #[test]
  fn emits_value_then_completes() {
    let log = Rc::new(RefCell::new(vec![]));
    let (l1, l2) = (log.clone(), log.clone());
    of::<_, ()>(100).subscribe_complete(
      move |v| l1.borrow_mut().push(v),
      move || l2.borrow_mut().push(-1),
    );
    assert_eq!(*log.borrow(), vec![100, -1]);
  }

  #[test]
  fn sequence_macro() {
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let source: Observable<&str, ()> = of_sequence!("a", "b", "c");
    source.subscribe(move |v| c_log.borrow_mut().push(v));
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
  }
}
