use crate::observable::{from_iter, Observable};

/// Runs the sources one after another, subscribing to each only after the
/// previous one completed.
pub fn concat<Item, Err>(sources: impl IntoIterator<Item = Observable<Item, Err>>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  let sources: Vec<_> = sources.into_iter().collect();
  from_iter::<_, Err>(sources).concat_all()
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Continues with `other` once this stream completed.
  pub fn concat_with(self, other: Observable<Item, Err>) -> Observable<Item, Err> { concat([self, other]) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    observable::timer,
    scheduler::{Scheduler, VirtualScheduler},
  };
  use std::{cell::RefCell, rc::Rc, time::Duration};

  #[test]
  fn later_source_waits_for_earlier_completion() {
    let scheduler = VirtualScheduler::new();
    let log = Rc::new(RefCell::new(vec![]));
    let c_log = log.clone();
    let c_scheduler = scheduler.clone();
    let slow = timer::<(), _>(Duration::from_millis(5), scheduler.clone()).map(|_| "slow");
    let fast = timer::<(), _>(Duration::from_millis(1), scheduler.clone()).map(|_| "fast");
    concat([slow, fast]).subscribe(move |v| c_log.borrow_mut().push((v, c_scheduler.now())));
    scheduler.flush();
    assert_eq!(
      *log.borrow(),
      vec![("slow", Duration::from_millis(5)), ("fast", Duration::from_millis(6))]
    );
  }

  #[test]
  fn error_stops_the_chain() {
    let log = Rc::new(RefCell::new(vec![]));
    let (c_log, e_log) = (log.clone(), log.clone());
    from_iter::<_, &str>(vec![1])
      .concat_with(crate::observable::throw_err("bad"))
      .concat_with(from_iter(vec![2]))
      .subscribe_err(
        move |v| c_log.borrow_mut().push(format!("{v}")),
        move |e| e_log.borrow_mut().push(e.to_string()),
      );
    assert_eq!(*log.borrow(), vec!["1", "bad"]);
  }
}
