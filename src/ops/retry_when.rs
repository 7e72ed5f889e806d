use std::{cell::RefCell, rc::Rc};

use crate::{observable::Observable, observer::Observer, subject::Subject, subscriber::Subscriber};

impl<Item: 'static, Err: Clone + 'static> Observable<Item, Err> {
  /// Resubscribes whenever the stream built by `notifier` emits.
  ///
  /// `notifier` is called once per subscription, lazily on the first error,
  /// with a stream of all errors of the source. The source is not re-run
  /// until that stream emits. When it completes the result completes; when it
  /// errors the result errors with that error.
  pub fn retry_when<N, F>(self, notifier: F) -> Observable<Item, Err>
  where
    N: 'static,
    F: Fn(Observable<Err, Err>) -> Observable<N, Err> + 'static,
  {
    let notifier = Rc::new(notifier);
    Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let state = Rc::new(RetryWhenState {
        source: self.clone(),
        observer: subscriber,
        notifier: notifier.clone(),
        errors: RefCell::new(None),
      });
      subscribe_source(&state);
    })
  }
}

struct RetryWhenState<Item, Err, F> {
  source: Observable<Item, Err>,
  observer: Subscriber<Item, Err>,
  notifier: Rc<F>,
  errors: RefCell<Option<Subject<Err, Err>>>,
}

fn subscribe_source<Item, Err, N, F>(state: &Rc<RetryWhenState<Item, Err, F>>)
where
  Item: 'static,
  Err: Clone + 'static,
  N: 'static,
  F: Fn(Observable<Err, Err>) -> Observable<N, Err> + 'static,
{
  if state.observer.is_closed() {
    return;
  }
  let subscription = state.source.subscribe_with(RetryWhenObserver(state.clone()));
  state.observer.add(subscription);
}

struct RetryWhenObserver<Item, Err, F>(Rc<RetryWhenState<Item, Err, F>>);

impl<Item, Err, N, F> Observer<Item, Err> for RetryWhenObserver<Item, Err, F>
where
  Item: 'static,
  Err: Clone + 'static,
  N: 'static,
  F: Fn(Observable<Err, Err>) -> Observable<N, Err> + 'static,
{
  #[inline]
  fn next(&mut self, value: Item) { self.0.observer.next(value) }

  fn error(&mut self, err: Err) {
    let state = &self.0;
    let existing = state.errors.borrow().clone();
    let errors = match existing {
      Some(errors) => errors,
      None => {
        let errors = Subject::new();
        *state.errors.borrow_mut() = Some(errors.clone());
        let retries = (state.notifier)(errors.as_observable());
        let subscription = retries.subscribe_with(NotifierObserver(state.clone()));
        state.observer.add(subscription);
        errors
      }
    };
    errors.next(err);
  }

  #[inline]
  fn complete(&mut self) { self.0.observer.complete() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.observer.is_closed() }
}

struct NotifierObserver<Item, Err, F>(Rc<RetryWhenState<Item, Err, F>>);

impl<Item, Err, N, F> Observer<N, Err> for NotifierObserver<Item, Err, F>
where
  Item: 'static,
  Err: Clone + 'static,
  N: 'static,
  F: Fn(Observable<Err, Err>) -> Observable<N, Err> + 'static,
{
  fn next(&mut self, _: N) { subscribe_source(&self.0) }

  fn error(&mut self, err: Err) { self.0.observer.error(err) }

  fn complete(&mut self) { self.0.observer.complete() }

  fn is_closed(&self) -> bool { self.0.observer.is_closed() }
}
