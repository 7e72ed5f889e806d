use std::time::Duration;

use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  scheduler::Scheduler,
  subscriber::Subscriber,
};

/// Which value of a throttle window is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ThrottleEdge {
  /// The value that opened the window, right away.
  #[default]
  Leading,
  /// The last value seen during the window, when it closes.
  Trailing,
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Limits the rate of values: a value arriving while no window is open
  /// opens one for `duration`, and the values of each window collapse into
  /// one according to `edge`.
  ///
  /// With [`ThrottleEdge::Trailing`] emitting the held value starts the next
  /// window, and a value still held when the source completes is emitted
  /// before the completion.
  pub fn throttle_time<S: Scheduler>(self, duration: Duration, edge: ThrottleEdge, scheduler: S) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = MutRc::own(ThrottleState { window_open: false, trailing: None });
      self.subscribe_with(ThrottleObserver { observer: subscriber, duration, edge, scheduler: scheduler.clone(), state })
    })
  }
}

struct ThrottleState<Item> {
  window_open: bool,
  trailing: Option<Item>,
}

struct ThrottleObserver<Item, Err, S> {
  observer: Subscriber<Item, Err>,
  duration: Duration,
  edge: ThrottleEdge,
  scheduler: S,
  state: MutRc<ThrottleState<Item>>,
}

/// Closes the window after `duration`. A trailing value emitted on close
/// opens the next window right away, so it is throttled like a leading one.
fn open_window<Item: 'static, Err: 'static, S: Scheduler>(
  state: MutRc<ThrottleState<Item>>, observer: Subscriber<Item, Err>, scheduler: S, duration: Duration,
) {
  let c_observer = observer.clone();
  let c_scheduler = scheduler.clone();
  let handle = scheduler.schedule(Some(duration), move || {
    let trailing = {
      let mut state = state.rc_deref_mut();
      let trailing = state.trailing.take();
      state.window_open = trailing.is_some();
      trailing
    };
    if let Some(value) = trailing {
      c_observer.next(value);
      open_window(state, c_observer, c_scheduler, duration);
    }
  });
  observer.add(handle);
}

impl<Item: 'static, Err: 'static, S: Scheduler> Observer<Item, Err> for ThrottleObserver<Item, Err, S> {
  fn next(&mut self, value: Item) {
    let (opening, emit) = {
      let mut state = self.state.rc_deref_mut();
      let opening = !state.window_open;
      state.window_open = true;
      let emit = match self.edge {
        ThrottleEdge::Leading => opening.then_some(value),
        ThrottleEdge::Trailing => {
          state.trailing = Some(value);
          None
        }
      };
      (opening, emit)
    };
    if let Some(value) = emit {
      self.observer.next(value);
    }
    if opening {
      open_window(self.state.clone(), self.observer.clone(), self.scheduler.clone(), self.duration);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let trailing = self.state.rc_deref_mut().trailing.take();
    if let Some(value) = trailing {
      self.observer.next(value);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
