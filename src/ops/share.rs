use crate::{
  observable::Observable,
  rc::MutRc,
  subject::Subject,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike, Teardown},
};

impl<Item: Clone + 'static, Err: Clone + 'static> Observable<Item, Err> {
  /// Shares one execution of this stream between all concurrent subscribers.
  ///
  /// The first subscriber connects the source through a [`Subject`]; later
  /// ones join that execution and miss what was already emitted. When the
  /// last subscriber leaves the source is unsubscribed. After the source
  /// terminated, the next subscriber starts a fresh execution.
  pub fn share(self) -> Observable<Item, Err> {
    let state = MutRc::own(ShareState { subject: None, connection: None, ref_count: 0 });
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let (subject, connect) = {
        let mut state = state.rc_deref_mut();
        let subject = match &state.subject {
          Some(subject) if !subject.is_stopped() => subject.clone(),
          _ => {
            let subject = Subject::new();
            state.subject = Some(subject.clone());
            state.connection = None;
            state.ref_count = 0;
            subject
          }
        };
        state.ref_count += 1;
        (subject, state.ref_count == 1)
      };
      let subscription = subject.as_observable().subscribe_with(subscriber);
      if connect {
        let connection = self.subscribe_with(subject.clone());
        let mut state = state.rc_deref_mut();
        let current = state.subject.as_ref().is_some_and(|s| s.ptr_eq(&subject));
        if current && !subject.is_stopped() {
          state.connection = Some(connection);
        }
      }
      let state = state.clone();
      subscription.add(Teardown::from_fn(move || {
        let connection = {
          let mut state = state.rc_deref_mut();
          state.ref_count = state.ref_count.saturating_sub(1);
          if state.ref_count > 0 {
            return;
          }
          state.subject = None;
          state.connection.take()
        };
        if let Some(connection) = connection {
          connection.unsubscribe();
        }
      }));
      subscription
    })
  }
}

struct ShareState<Item, Err> {
  subject: Option<Subject<Item, Err>>,
  connection: Option<Subscription>,
  ref_count: usize,
}
