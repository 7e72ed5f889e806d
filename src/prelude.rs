//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Creation functions, used as `observable::from_iter(..)`
pub use crate::observable;
// Core types
pub use crate::{
  notification::Notification,
  observable::Observable,
  observer::{FnObserver, Observer},
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionGuard, SubscriptionLike, Teardown},
};
// Subject
pub use crate::subject::Subject;
// Schedulers
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::DeferredScheduler;
pub use crate::scheduler::{ImmediateScheduler, Scheduler, VirtualScheduler};
// Operator configuration
pub use crate::ops::{RetryConfig, RetryPolicy, ThrottleEdge};
// Marble testing
pub use crate::marble::{CharValues, MarbleValues, StringValues, TestScheduler};
// Errors
pub use crate::error::UsageError;
