//! Marble testing: timelines written as text and checked on virtual time.
//!
//! A marble diagram describes a stream frame by frame:
//!
//! | Marble | Meaning |
//! |--------|---------|
//! | `-` | one idle frame |
//! | `a` (any other character) | a value, looked up in a [`MarbleValues`] map |
//! | `\|` | completion |
//! | `#` | error |
//! | `(ab)` | `a` and `b` in the same frame; every character still takes a frame |
//! | `^` | the subscription point; frame zero of a hot stream |
//! | `!` | the unsubscription point (subscription diagrams only) |
//! | `10ms `, `2s `, `1m ` | time progression, followed by a space |
//! | ` ` | ignored |
//!
//! [`TestScheduler`] turns diagrams into cold and hot test observables,
//! subscribes the observable under test on a [`VirtualScheduler`] and
//! compares what it recorded with the expected diagram.
//!
//! ```rust
//! use rxmarble::{marble::TestScheduler, prelude::*};
//!
//! TestScheduler::new().run(|ts| {
//!   let values = [('a', 1), ('b', 2), ('c', 3)];
//!   let source = ts.cold::<_, (), _>("-a--b--c-|", &values);
//!   ts.expect_observable(source.observable().filter(|v| *v != 2))
//!     .to_be("-a-----c-|", &values);
//! });
//! ```
//!
//! [`VirtualScheduler`]: crate::scheduler::VirtualScheduler
use thiserror::Error;

use crate::notification::Notification;

mod parser;
mod render;
mod test_observable;
mod test_scheduler;
mod values;

pub use parser::{parse_marbles, parse_marbles_as_subscriptions};
pub use render::render_marbles;
pub use test_observable::TestObservable;
pub use test_scheduler::{ObservableExpectation, SubscriptionExpectation, TestScheduler, TestSchedulerConfig};
pub use values::{CharValues, MarbleValues, StringValues};

/// Position on a marble timeline. Frames before the subscription point of a
/// hot diagram are negative.
pub type Frame = i64;

/// One notification together with the frame it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestMessage<Item, Err> {
  pub frame: Frame,
  pub notification: Notification<Item, Err>,
}

impl<Item, Err> TestMessage<Item, Err> {
  pub fn new(frame: Frame, notification: Notification<Item, Err>) -> Self { TestMessage { frame, notification } }
}

/// When a subscription started and, if it did, when it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionLog {
  pub subscribed_frame: Frame,
  pub unsubscribed_frame: Option<Frame>,
}

impl SubscriptionLog {
  pub fn new(subscribed_frame: Frame, unsubscribed_frame: Option<Frame>) -> Self {
    SubscriptionLog { subscribed_frame, unsubscribed_frame }
  }
}

/// A malformed marble diagram.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarbleError {
  #[error("no value for marble '{key}' at index {index}")]
  UnknownValue { key: char, index: usize },
  #[error("marble '#' at index {index} but no error value was given")]
  MissingErrorValue { index: usize },
  #[error("conventional marble diagrams cannot have the unsubscription marker '!'")]
  UnexpectedUnsubscription,
  #[error("cold observable cannot have subscription offset '^'")]
  ColdSubscriptionOffset,
  #[error("found a second subscription point '^' in a subscription marble diagram")]
  DuplicateSubscription,
  #[error("found a second unsubscription point '!' in a subscription marble diagram")]
  DuplicateUnsubscription,
  #[error("there can only be '^' and '!' markers in a subscription marble diagram, found '{0}'")]
  UnexpectedSubscriptionMarble(char),
  #[error("marble diagram for time should have a completion marker '|'")]
  MissingCompletion,
}
