use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

impl<Item: 'static, Err: 'static> Observable<Observable<Item, Err>, Err> {
  /// Flattens a stream of streams by always following the latest inner
  /// stream; the previous one is unsubscribed before the next is subscribed.
  ///
  /// Completes once the outer stream and the current inner stream completed.
  pub fn switch_all(self) -> Observable<Item, Err> {
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = MutRc::own(SwitchState { epoch: 0, inner: None, inner_active: false, outer_completed: false });
      self.subscribe_with(SwitchOuterObserver { state, observer: subscriber })
    })
  }
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Maps each value to a stream and mirrors only the most recent one.
  pub fn switch_map<U, F>(self, f: F) -> Observable<U, Err>
  where
    U: 'static,
    F: Fn(Item) -> Observable<U, Err> + 'static,
  {
    self.map(f).switch_all()
  }
}

struct SwitchState {
  epoch: usize,
  inner: Option<Subscription>,
  inner_active: bool,
  outer_completed: bool,
}

struct SwitchOuterObserver<Item, Err> {
  state: MutRc<SwitchState>,
  observer: Subscriber<Item, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Observable<Item, Err>, Err> for SwitchOuterObserver<Item, Err> {
  fn next(&mut self, inner: Observable<Item, Err>) {
    let (epoch, previous) = {
      let mut state = self.state.rc_deref_mut();
      state.epoch += 1;
      state.inner_active = true;
      (state.epoch, state.inner.take())
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
    let subscription = inner.subscribe_with(SwitchInnerObserver {
      epoch,
      state: self.state.clone(),
      observer: self.observer.clone(),
    });
    {
      let mut state = self.state.rc_deref_mut();
      if state.epoch == epoch {
        state.inner = Some(subscription.clone());
      }
    }
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

struct SwitchInnerObserver<Item, Err> {
  epoch: usize,
  state: MutRc<SwitchState>,
  observer: Subscriber<Item, Err>,
}

impl<Item, Err> SwitchInnerObserver<Item, Err> {
  fn is_current(&self) -> bool { self.state.rc_deref().epoch == self.epoch }
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for SwitchInnerObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.is_current() {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: Err) {
    if self.is_current() {
      self.observer.error(err);
    }
  }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      if state.epoch != self.epoch {
        return;
      }
      state.inner_active = false;
      state.inner = None;
      state.outer_completed
    };
    if done {
      self.observer.complete();
    }
  }

  fn is_closed(&self) -> bool { !self.is_current() || self.observer.is_closed() }
}
