use std::time::Duration;

use crate::{observable::Observable, scheduler::Scheduler};

use super::timer_periodic;

/// Creates an observable which will fire at `period` intervals on
/// `scheduler`, emitting an increasing counter starting at zero.
///
/// The first value is emitted after one full period. Never completes.
///
/// ```
/// use rxmarble::prelude::*;
/// use std::time::Duration;
///
/// let scheduler = VirtualScheduler::new();
/// let source: Observable<usize, ()> = observable::interval(Duration::from_millis(10), scheduler.clone());
/// source.take(3).subscribe(|v| println!("{v}"));
/// scheduler.flush();
/// ```
pub fn interval<Err, S>(period: Duration, scheduler: S) -> Observable<usize, Err>
where
  Err: 'static,
  S: Scheduler,
{
  timer_periodic(period, period, scheduler)
}
