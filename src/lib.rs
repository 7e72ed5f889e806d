//! # rxmarble: push-based reactive streams with marble testing
//!
//! A single-threaded implementation of [Reactive Extensions](http://reactivex.io/)
//! together with a virtual-time harness that checks timing with marble
//! diagrams.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxmarble::prelude::*;
//!
//! observable::from_iter::<_, ()>(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A lazy stream; every subscription runs its producer anew |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Observer and observable at once, for multicasting |
//! | [`Scheduler`] | Decides when time-based work runs |
//! | [`TestScheduler`] | Runs marble tests on virtual time |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): the `DeferredScheduler` event loop and
//!   the adapters from futures
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler
//! [`TestScheduler`]: marble::TestScheduler

pub mod error;
pub mod marble;
pub mod notification;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
