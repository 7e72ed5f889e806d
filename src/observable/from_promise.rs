#[cfg(feature = "futures-scheduler")]
use std::future::Future;

#[cfg(feature = "futures-scheduler")]
use crate::scheduler::DeferredScheduler;
use crate::{observable::Observable, rc::MutRc, subscriber::Subscriber};

/// A value that will be available later: either fulfilled with `T` or
/// rejected with `E`.
pub trait Thenable<T, E> {
  /// Registers the callbacks; exactly one of them runs, once, when the
  /// outcome is known (immediately if it already is).
  fn then(&self, on_fulfilled: Box<dyn FnOnce(T)>, on_rejected: Box<dyn FnOnce(E)>);
}

type Callbacks<T, E> = Vec<(Box<dyn FnOnce(T)>, Box<dyn FnOnce(E)>)>;

enum PromiseState<T, E> {
  Pending(Callbacks<T, E>),
  Fulfilled(T),
  Rejected(E),
}

/// A settle-once cell whose outcome is cached for every later `then`.
pub struct Promise<T, E>(MutRc<PromiseState<T, E>>);

impl<T, E> Clone for Promise<T, E> {
  fn clone(&self) -> Self { Promise(self.0.clone()) }
}

impl<T: Clone + 'static, E: Clone + 'static> Promise<T, E> {
  pub fn pending() -> Self { Promise(MutRc::own(PromiseState::Pending(vec![]))) }

  pub fn resolved(value: T) -> Self { Promise(MutRc::own(PromiseState::Fulfilled(value))) }

  pub fn rejected(err: E) -> Self { Promise(MutRc::own(PromiseState::Rejected(err))) }

  /// A promise settled by `future`, which is spawned on the
  /// [`DeferredScheduler`] and so starts running once that loop is driven.
  #[cfg(feature = "futures-scheduler")]
  pub fn from_future<F>(future: F) -> Self
  where
    F: Future<Output = Result<T, E>> + 'static,
  {
    let promise = Self::pending();
    let c_promise = promise.clone();
    DeferredScheduler::spawn_local(async move {
      match future.await {
        Ok(v) => c_promise.resolve(v),
        Err(e) => c_promise.reject(e),
      }
    });
    promise
  }

  /// Fulfils the promise; ignored once it is settled.
  pub fn resolve(&self, value: T) { self.settle(Ok(value)) }

  /// Rejects the promise; ignored once it is settled.
  pub fn reject(&self, err: E) { self.settle(Err(err)) }

  pub fn is_settled(&self) -> bool { !matches!(*self.0.rc_deref(), PromiseState::Pending(_)) }

  fn settle(&self, outcome: Result<T, E>) {
    let callbacks = {
      let mut state = self.0.rc_deref_mut();
      if !matches!(*state, PromiseState::Pending(_)) {
        return;
      }
      let settled = match &outcome {
        Ok(v) => PromiseState::Fulfilled(v.clone()),
        Err(e) => PromiseState::Rejected(e.clone()),
      };
      match std::mem::replace(&mut *state, settled) {
        PromiseState::Pending(callbacks) => callbacks,
        _ => vec![],
      }
    };
    for (on_fulfilled, on_rejected) in callbacks {
      match &outcome {
        Ok(v) => on_fulfilled(v.clone()),
        Err(e) => on_rejected(e.clone()),
      }
    }
  }
}

impl<T: Clone + 'static, E: Clone + 'static> Thenable<T, E> for Promise<T, E> {
  fn then(&self, on_fulfilled: Box<dyn FnOnce(T)>, on_rejected: Box<dyn FnOnce(E)>) {
    let outcome = {
      let mut state = self.0.rc_deref_mut();
      match &mut *state {
        PromiseState::Pending(callbacks) => {
          callbacks.push((on_fulfilled, on_rejected));
          return;
        }
        PromiseState::Fulfilled(v) => Ok(v.clone()),
        PromiseState::Rejected(e) => Err(e.clone()),
      }
    };
    match outcome {
      Ok(v) => on_fulfilled(v),
      Err(e) => on_rejected(e),
    }
  }
}

/// Creates an observable that emits the promise's value and completes, or
/// errors with its rejection. Subscribing after the promise settled still
/// delivers the cached outcome.
pub fn from_promise<P, T, E>(promise: P) -> Observable<T, E>
where
  P: Thenable<T, E> + 'static,
  T: 'static,
  E: 'static,
{
  Observable::new(move |subscriber: Subscriber<T, E>| {
    let on_value = subscriber.clone();
    promise.then(
      Box::new(move |v: T| {
        on_value.next(v);
        on_value.complete();
      }),
      Box::new(move |e: E| subscriber.error(e)),
    );
  })
}

/// Runs `future` on the [`DeferredScheduler`] right away and exposes its
/// outcome as an observable, like [`from_promise`] over
/// [`Promise::from_future`].
#[cfg(feature = "futures-scheduler")]
pub fn from_future<F, T, E>(future: F) -> Observable<T, E>
where
  F: Future<Output = Result<T, E>> + 'static,
  T: Clone + 'static,
  E: Clone + 'static,
{
  from_promise(Promise::from_future(future))
}
