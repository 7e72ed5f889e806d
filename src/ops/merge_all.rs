use std::collections::VecDeque;

use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Observable<Item, Err>, Err> {
  /// Flattens a stream of streams by subscribing to up to `concurrent` inner
  /// streams at a time.
  ///
  /// Inner streams beyond the limit wait in FIFO order and start as active
  /// ones complete. Values are forwarded in arrival order. The result
  /// completes once the outer stream and every inner stream completed; any
  /// error ends it immediately and cancels everything else.
  pub fn merge_all(self, concurrent: usize) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = MutRc::own(MergeState {
        active: 0,
        concurrent: concurrent.max(1),
        buffer: VecDeque::new(),
        outer_completed: false,
        draining: false,
      });
      self.subscribe_with(MergeOuterObserver { state, observer: subscriber })
    })
  }

  /// Subscribes to inner streams strictly one after another.
  #[inline]
  pub fn concat_all(self) -> Observable<Item, Err> { self.merge_all(1) }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Maps each value to a stream and merges all of them.
  pub fn merge_map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Observable<U, Err> + 'static,
  {
    self.map(f).merge_all(usize::MAX)
  }

  /// Like [`merge_map`](Observable::merge_map) with at most `concurrent`
  /// inner streams subscribed at once.
  pub fn merge_map_with_limit<U, F>(self, f: F, concurrent: usize) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Observable<U, Err> + 'static,
  {
    self.map(f).merge_all(concurrent)
  }

  /// Maps each value to a stream and runs those streams one after another.
  pub fn concat_map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Observable<U, Err> + 'static,
  {
    self.map(f).concat_all()
  }
}

struct MergeState<Item, Err> {
  active: usize,
  concurrent: usize,
  buffer: VecDeque<Observable<Item, Err>>,
  outer_completed: bool,
  draining: bool,
}

impl<Item, Err> MergeState<Item, Err> {
  fn is_done(&self) -> bool { self.outer_completed && self.active == 0 && self.buffer.is_empty() }
}

fn subscribe_inner<Item: 'static, Err: 'static>(
  inner: Observable<Item, Err>, state: &MutRc<MergeState<Item, Err>>, observer: &Subscriber<Item, Err>,
) {
  let subscription =
    inner.subscribe_with(MergeInnerObserver { state: state.clone(), observer: observer.clone() });
  observer.add(subscription);
}

struct MergeOuterObserver<Item, Err> {
  state: MutRc<MergeState<Item, Err>>,
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Observable<Item, Err>, Err> for MergeOuterObserver<Item, Err> {
  fn next(&mut self, inner: Observable<Item, Err>) {
    let start = {
      let mut state = self.state.rc_deref_mut();
      if state.active < state.concurrent {
        state.active += 1;
        Some(inner)
      } else {
        state.buffer.push_back(inner);
        None
      }
    };
    if let Some(inner) = start {
      subscribe_inner(inner, &self.state, &self.observer);
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      state.is_done()
    };
    if done {
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

struct MergeInnerObserver<Item, Err> {
  state: MutRc<MergeState<Item, Err>>,
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for MergeInnerObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    {
      let mut state = self.state.rc_deref_mut();
      state.active -= 1;
      // The drain loop further up the stack refills the freed slot.
      if state.draining {
        return;
      }
      state.draining = true;
    }
    loop {
      let queued = {
        let mut state = self.state.rc_deref_mut();
        if self.observer.is_closed() || state.active >= state.concurrent {
          None
        } else {
          let inner = state.buffer.pop_front();
          if inner.is_some() {
            state.active += 1;
          }
          inner
        }
      };
      match queued {
        Some(inner) => subscribe_inner(inner, &self.state, &self.observer),
        None => break,
      }
    }
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.draining = false;
      state.is_done()
    };
    if done {
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
