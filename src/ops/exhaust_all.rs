use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

impl<Item: 'static, Err: 'static> Observable<Observable<Item, Err>, Err> {
  /// Flattens a stream of streams by ignoring every inner stream that
  /// arrives while another one is still running.
  pub fn exhaust_all(self) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = MutRc::own(ExhaustState { inner_active: false, outer_completed: false });
      self.subscribe_with(ExhaustOuterObserver { state, observer: subscriber })
    })
  }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Maps each value to a stream, dropping values that arrive while the
  /// previous mapped stream is still running.
  pub fn exhaust_map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Observable<U, Err> + 'static,
  {
    self.map(f).exhaust_all()
  }
}

struct ExhaustState {
  inner_active: bool,
  outer_completed: bool,
}

struct ExhaustOuterObserver<Item, Err> {
  state: MutRc<ExhaustState>,
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Observable<Item, Err>, Err> for ExhaustOuterObserver<Item, Err> {
  fn next(&mut self, inner: Observable<Item, Err>) {
    {
      let mut state = self.state.rc_deref_mut();
      if state.inner_active {
        return;
      }
      state.inner_active = true;
    }
    let subscription =
      inner.subscribe_with(ExhaustInnerObserver { state: self.state.clone(), observer: self.observer.clone() });
    self.observer.add(subscription);
  }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      !state.inner_active
    };
    if done {
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

struct ExhaustInnerObserver<Item, Err> {
  state: MutRc<ExhaustState>,
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for ExhaustInnerObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.inner_active = false;
      state.outer_completed
    };
    if done {
      self.observer.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
