use std::{rc::Rc, time::Duration};

use super::{Frame, SubscriptionLog, TestMessage};
use crate::{
  observable::Observable,
  rc::MutRc,
  scheduler::{Scheduler, VirtualScheduler},
  subject::Subject,
  subscriber::Subscriber,
  subscription::{SubscriptionLike, Teardown},
};

/// An observable built from a marble diagram that records every
/// subscription made to it.
pub struct TestObservable<Item, Err> {
  observable: Observable<Item, Err>,
  logs: MutRc<Vec<SubscriptionLog>>,
}

impl<Item, Err> Clone for TestObservable<Item, Err> {
  fn clone(&self) -> Self { TestObservable { observable: self.observable.clone(), logs: self.logs.clone() } }
}

impl<Item: Clone + 'static, Err: Clone + 'static> TestObservable<Item, Err> {
  /// Every subscription replays all messages, shifted to its own subscribe
  /// frame.
  pub(crate) fn cold(messages: Vec<TestMessage<Item, Err>>, clock: FrameClock) -> Self {
    let logs = MutRc::own(vec![]);
    let messages = Rc::new(messages);
    let c_logs = logs.clone();
    let observable = Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let index = log_subscribed(&c_logs, &clock);
      for message in messages.iter() {
        let notification = message.notification.clone();
        let mut c_subscriber = subscriber.clone();
        let handle = clock
          .scheduler
          .schedule(Some(clock.duration_of(message.frame)), move || notification.observe(&mut c_subscriber));
        subscriber.add(handle);
      }
      Teardown::from_fn(unsubscribed_logger(&c_logs, &clock, index))
    });
    TestObservable { observable, logs }
  }

  /// Messages go out on the shared timeline once `setup` returned by this
  /// function runs; subscribers only see what happens after they joined.
  pub(crate) fn hot(messages: Vec<TestMessage<Item, Err>>, clock: FrameClock) -> (Self, Box<dyn FnOnce()>) {
    let logs = MutRc::own(vec![]);
    let subject = Subject::<Item, Err>::new();
    let source = subject.as_observable();
    let c_logs = logs.clone();
    let c_clock = clock.clone();
    let observable = Observable::new(move |subscriber: Subscriber<Item, Err>| {
      let index = log_subscribed(&c_logs, &c_clock);
      let inner = source.subscribe_with(subscriber.clone());
      let log_unsubscribed = unsubscribed_logger(&c_logs, &c_clock, index);
      Teardown::from_fn(move || {
        inner.unsubscribe();
        log_unsubscribed();
      })
    });

    let setup: Box<dyn FnOnce()> = Box::new(move || {
      for message in messages {
        if message.frame < 0 {
          continue;
        }
        let mut c_subject = subject.clone();
        let TestMessage { frame, notification } = message;
        clock.scheduler.schedule(Some(clock.duration_of(frame)), move || notification.observe(&mut c_subject));
      }
    });
    (TestObservable { observable, logs }, setup)
  }
}

impl<Item, Err> TestObservable<Item, Err> {
  /// The observable to subscribe to or to feed into operators.
  pub fn observable(&self) -> Observable<Item, Err> { self.observable.clone() }

  /// Every subscription made so far.
  pub fn subscriptions(&self) -> Vec<SubscriptionLog> { self.logs.rc_deref().clone() }

  pub(crate) fn logs(&self) -> MutRc<Vec<SubscriptionLog>> { self.logs.clone() }
}

/// Converts between virtual time and frames.
#[derive(Clone)]
pub(crate) struct FrameClock {
  pub(crate) scheduler: VirtualScheduler,
  pub(crate) frame_duration: Duration,
}

impl FrameClock {
  pub(crate) fn now_frame(&self) -> Frame {
    let nanos = self.frame_duration.as_nanos().max(1);
    (self.scheduler.now().as_nanos() / nanos) as Frame
  }

  pub(crate) fn duration_of(&self, frames: Frame) -> Duration {
    let frames = u32::try_from(frames.max(0)).unwrap_or(u32::MAX);
    self.frame_duration.saturating_mul(frames)
  }
}

fn log_subscribed(logs: &MutRc<Vec<SubscriptionLog>>, clock: &FrameClock) -> usize {
  let mut logs = logs.rc_deref_mut();
  logs.push(SubscriptionLog::new(clock.now_frame(), None));
  logs.len() - 1
}

fn unsubscribed_logger(
  logs: &MutRc<Vec<SubscriptionLog>>, clock: &FrameClock, index: usize,
) -> impl FnOnce() + 'static {
  let logs = logs.clone();
  let clock = clock.clone();
  move || {
    if let Some(log) = logs.rc_deref_mut().get_mut(index) {
      log.unsubscribed_frame = Some(clock.now_frame());
    }
  }
}
