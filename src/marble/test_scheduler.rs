use std::{fmt::Debug, time::Duration};

use super::{
  parser::{parse_marbles_in, subscription_frames},
  render_marbles,
  test_observable::FrameClock,
  Frame, MarbleError, MarbleValues, SubscriptionLog, TestMessage, TestObservable,
};
use crate::{
  notification::Notification,
  observable::Observable,
  observer::Observer,
  rc::MutRc,
  scheduler::{Scheduler, VirtualScheduler},
  subscription::{Subscription, SubscriptionLike},
};

type Deferred = MutRc<Vec<Box<dyn FnOnce()>>>;

/// Settings of a [`TestScheduler`].
///
/// ```rust
/// use rxmarble::marble::{TestScheduler, TestSchedulerConfig};
/// use std::time::Duration;
///
/// let ts = TestScheduler::with_config(
///   TestSchedulerConfig::new().frame_duration(Duration::from_millis(10)).max_frames(50),
/// );
/// assert_eq!(ts.time("---|"), Duration::from_millis(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestSchedulerConfig {
  frame_duration: Duration,
  max_frames: Frame,
}

impl Default for TestSchedulerConfig {
  fn default() -> Self { TestSchedulerConfig { frame_duration: Duration::from_millis(1), max_frames: 1000 } }
}

impl TestSchedulerConfig {
  /// One millisecond per frame, at most 1000 frames per flush.
  pub fn new() -> Self { Self::default() }

  /// Virtual time one marble character stands for.
  pub fn frame_duration(mut self, frame_duration: Duration) -> Self {
    self.frame_duration = frame_duration;
    self
  }

  /// Work scheduled later than this many frames is left unrun by
  /// [`TestScheduler::flush`], so never-ending sources still terminate.
  pub fn max_frames(mut self, max_frames: Frame) -> Self {
    self.max_frames = max_frames;
    self
  }
}

/// Runs marble tests on a virtual clock.
///
/// Test observables and expectations are declared first; [`flush`] then
/// starts the hot observables, runs the clock through every scheduled task
/// and checks each expectation, panicking with both timelines on the first
/// mismatch. [`run`] does the declaring and flushing in one call.
///
/// Operators under test have to be given [`scheduler`] wherever they take a
/// scheduler, so that their timing happens on the same clock.
///
/// ```rust
/// use rxmarble::{marble::TestScheduler, prelude::*};
///
/// TestScheduler::new().run(|ts| {
///   let values = [('a', 0), ('b', 1)];
///   let source = observable::interval::<(), _>(ts.time("--|"), ts.scheduler()).take(2);
///   ts.expect_observable(source).to_be("--a-(b|)", &values);
/// });
/// ```
///
/// [`flush`]: TestScheduler::flush
/// [`run`]: TestScheduler::run
/// [`scheduler`]: TestScheduler::scheduler
pub struct TestScheduler {
  clock: FrameClock,
  max_frames: Frame,
  hot_setups: Deferred,
  flush_tests: Deferred,
}

impl Default for TestScheduler {
  fn default() -> Self { Self::with_config(TestSchedulerConfig::default()) }
}

impl TestScheduler {
  pub fn new() -> Self { Self::default() }

  pub fn with_config(config: TestSchedulerConfig) -> Self {
    TestScheduler {
      clock: FrameClock { scheduler: VirtualScheduler::new(), frame_duration: config.frame_duration },
      max_frames: config.max_frames,
      hot_setups: MutRc::own(vec![]),
      flush_tests: MutRc::own(vec![]),
    }
  }

  /// The virtual scheduler driving this harness.
  pub fn scheduler(&self) -> VirtualScheduler { self.clock.scheduler.clone() }

  /// Current virtual time in frames.
  pub fn now_frame(&self) -> Frame { self.clock.now_frame() }

  /// Virtual time up to the `|` of `marbles`, for timing operators in step
  /// with a diagram.
  ///
  /// # Panics
  ///
  /// Panics when `marbles` has no `|`.
  pub fn time(&self, marbles: &str) -> Duration {
    match marbles.trim().chars().position(|c| c == '|') {
      Some(index) => self.clock.duration_of(index as Frame),
      None => panic!("{}", MarbleError::MissingCompletion),
    }
  }

  /// A cold observable: each subscription gets the whole diagram, starting
  /// at its own subscribe frame.
  ///
  /// # Panics
  ///
  /// Panics on a malformed diagram, on `^`, and on `#`, which needs
  /// [`cold_with_error`](TestScheduler::cold_with_error).
  pub fn cold<Item, Err, V>(&self, marbles: &str, values: &V) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    self.build_cold(marbles, values, None)
  }

  pub fn cold_with_error<Item, Err, V>(&self, marbles: &str, values: &V, error: Err) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    self.build_cold(marbles, values, Some(error))
  }

  /// A hot observable: the diagram plays once on the shared clock from the
  /// start of [`flush`](TestScheduler::flush), `^` marking frame zero.
  /// Subscribers only see what comes after they subscribed.
  ///
  /// # Panics
  ///
  /// Panics on a malformed diagram and on `#`, which needs
  /// [`hot_with_error`](TestScheduler::hot_with_error).
  pub fn hot<Item, Err, V>(&self, marbles: &str, values: &V) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    self.build_hot(marbles, values, None)
  }

  pub fn hot_with_error<Item, Err, V>(&self, marbles: &str, values: &V, error: Err) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    self.build_hot(marbles, values, Some(error))
  }

  /// Subscribes `observable` at frame zero and records what it emits.
  pub fn expect_observable<Item, Err>(&self, observable: Observable<Item, Err>) -> ObservableExpectation<Item, Err>
  where
    Item: 'static,
    Err: 'static,
  {
    self.expect_observable_within(observable, "")
  }

  /// Like [`expect_observable`](TestScheduler::expect_observable), but
  /// subscribes at the `^` of `subscription_marbles` and unsubscribes at its
  /// `!`.
  ///
  /// # Panics
  ///
  /// Panics on a malformed subscription diagram.
  pub fn expect_observable_within<Item, Err>(
    &self, observable: Observable<Item, Err>, subscription_marbles: &str,
  ) -> ObservableExpectation<Item, Err>
  where
    Item: 'static,
    Err: 'static,
  {
    let (subscribed, unsubscribed) = match subscription_frames(subscription_marbles, self.clock.frame_duration) {
      Ok(frames) => frames,
      Err(err) => invalid_marbles(subscription_marbles, err),
    };
    let actual = MutRc::own(vec![]);
    let subscription = MutRc::own(None::<Subscription>);

    let recorder = Recorder { actual: actual.clone(), clock: self.clock.clone() };
    let c_subscription = subscription.clone();
    self.clock.scheduler.schedule(Some(self.clock.duration_of(subscribed.unwrap_or(0))), move || {
      *c_subscription.rc_deref_mut() = Some(observable.subscribe_with(recorder));
    });
    if let Some(frame) = unsubscribed {
      self.clock.scheduler.schedule(Some(self.clock.duration_of(frame)), move || {
        if let Some(subscription) = subscription.rc_deref_mut().take() {
          subscription.unsubscribe();
        }
      });
    }

    ObservableExpectation { actual, clock: self.clock.clone(), flush_tests: self.flush_tests.clone() }
  }

  /// Checks the subscriptions made to `observable` once flushed.
  pub fn expect_subscriptions<Item, Err>(&self, observable: &TestObservable<Item, Err>) -> SubscriptionExpectation {
    SubscriptionExpectation {
      actual: observable.logs(),
      frame_duration: self.clock.frame_duration,
      flush_tests: self.flush_tests.clone(),
    }
  }

  /// Starts the hot observables, runs the clock up to the frame limit and
  /// checks every expectation declared so far.
  ///
  /// # Panics
  ///
  /// Panics when an expectation does not match.
  pub fn flush(&self) {
    let setups = std::mem::take(&mut *self.hot_setups.rc_deref_mut());
    for setup in setups {
      setup();
    }
    tracing::debug!(max_frames = self.max_frames, "flushing test scheduler");
    self.clock.scheduler.flush_until(self.clock.duration_of(self.max_frames));

    let tests = std::mem::take(&mut *self.flush_tests.rc_deref_mut());
    for test in tests {
      test();
    }
  }

  /// Calls `f` to declare a test, then [`flush`](TestScheduler::flush)es.
  pub fn run<R>(&self, f: impl FnOnce(&TestScheduler) -> R) -> R {
    let result = f(self);
    self.flush();
    result
  }

  fn build_cold<Item, Err, V>(&self, marbles: &str, values: &V, error: Option<Err>) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    if marbles.contains('^') {
      invalid_marbles(marbles, MarbleError::ColdSubscriptionOffset)
    }
    TestObservable::cold(self.parse(marbles, values, error), self.clock.clone())
  }

  fn build_hot<Item, Err, V>(&self, marbles: &str, values: &V, error: Option<Err>) -> TestObservable<Item, Err>
  where
    Item: Clone + 'static,
    Err: Clone + 'static,
    V: MarbleValues<Item> + ?Sized,
  {
    let (observable, setup) = TestObservable::hot(self.parse(marbles, values, error), self.clock.clone());
    self.hot_setups.rc_deref_mut().push(setup);
    observable
  }

  fn parse<Item, Err, V>(&self, marbles: &str, values: &V, error: Option<Err>) -> Vec<TestMessage<Item, Err>>
  where
    Err: Clone,
    V: MarbleValues<Item> + ?Sized,
  {
    match parse_marbles_in(marbles, values, error, self.clock.frame_duration) {
      Ok(messages) => messages,
      Err(err) => invalid_marbles(marbles, err),
    }
  }
}

/// What an observable under test is expected to emit. Nothing is checked
/// unless one of the `to_be` methods is called.
#[must_use = "an expectation is only checked after `to_be` is called"]
pub struct ObservableExpectation<Item, Err> {
  actual: MutRc<Vec<TestMessage<Item, Err>>>,
  clock: FrameClock,
  flush_tests: Deferred,
}

impl<Item, Err> ObservableExpectation<Item, Err>
where
  Item: Clone + PartialEq + Debug + 'static,
  Err: Clone + PartialEq + Debug + 'static,
{
  /// # Panics
  ///
  /// Panics on a malformed diagram, and on `#`, which needs
  /// [`to_be_with_error`](ObservableExpectation::to_be_with_error).
  pub fn to_be<V>(self, marbles: &str, values: &V)
  where
    V: MarbleValues<Item> + ?Sized,
  {
    self.expect(marbles, values, None)
  }

  pub fn to_be_with_error<V>(self, marbles: &str, values: &V, error: Err)
  where
    V: MarbleValues<Item> + ?Sized,
  {
    self.expect(marbles, values, Some(error))
  }

  fn expect<V>(self, marbles: &str, values: &V, error: Option<Err>)
  where
    V: MarbleValues<Item> + ?Sized,
  {
    let expected = match parse_marbles_in(marbles, values, error, self.clock.frame_duration) {
      Ok(messages) => messages,
      Err(err) => invalid_marbles(marbles, err),
    };
    // Keys used by the diagram are enough to draw what actually happened.
    let keys: Vec<(char, Item)> = marbles.chars().filter_map(|c| values.value_of(c).map(|v| (c, v))).collect();
    let actual = self.actual;
    self.flush_tests.rc_deref_mut().push(Box::new(move || {
      let actual = actual.rc_deref();
      if *actual != expected {
        panic!(
          "marble diagrams differ\nexpected: {}\n  actual: {}\n\nexpected messages: {:?}\n  actual messages: {:?}",
          render_marbles(&expected, &keys),
          render_marbles(&actual, &keys),
          expected,
          *actual,
        );
      }
    }));
  }
}

/// What subscriptions a test observable is expected to have seen.
#[must_use = "an expectation is only checked after `to_be` is called"]
pub struct SubscriptionExpectation {
  actual: MutRc<Vec<SubscriptionLog>>,
  frame_duration: Duration,
  flush_tests: Deferred,
}

impl SubscriptionExpectation {
  /// Exactly one subscription, or none for a diagram without `^`.
  pub fn to_be(self, marbles: &str) { self.to_be_many(&[marbles]) }

  /// One diagram per subscription, in subscription order.
  ///
  /// # Panics
  ///
  /// Panics on a malformed diagram.
  pub fn to_be_many(self, marbles: &[&str]) {
    let mut expected = vec![];
    for m in marbles {
      match subscription_frames(m, self.frame_duration) {
        Ok((Some(subscribed), unsubscribed)) => expected.push(SubscriptionLog::new(subscribed, unsubscribed)),
        Ok((None, _)) => {}
        Err(err) => invalid_marbles(m, err),
      }
    }
    let actual = self.actual;
    self.flush_tests.rc_deref_mut().push(Box::new(move || {
      let actual = actual.rc_deref();
      if *actual != expected {
        panic!("subscriptions differ\nexpected: {expected:?}\n  actual: {:?}", *actual);
      }
    }));
  }
}

struct Recorder<Item, Err> {
  actual: MutRc<Vec<TestMessage<Item, Err>>>,
  clock: FrameClock,
}

impl<Item, Err> Recorder<Item, Err> {
  fn record(&self, notification: Notification<Item, Err>) {
    let frame = self.clock.now_frame();
    self.actual.rc_deref_mut().push(TestMessage::new(frame, notification));
  }
}

impl<Item, Err> Observer<Item, Err> for Recorder<Item, Err> {
  fn next(&mut self, value: Item) { self.record(Notification::Next(value)) }

  fn error(&mut self, err: Err) { self.record(Notification::Error(err)) }

  fn complete(&mut self) { self.record(Notification::Complete) }
}

fn invalid_marbles(marbles: &str, err: MarbleError) -> ! { panic!("invalid marble diagram {marbles:?}: {err}") }
