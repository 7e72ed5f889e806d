use crate::observer::Observer;

/// One message of a stream, reified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  /// Delivers this notification to `observer`.
  pub fn observe<O>(self, observer: &mut O)
  where
    O: Observer<Item, Err> + ?Sized,
  {
    match self {
      Notification::Next(v) => observer.next(v),
      Notification::Error(e) => observer.error(e),
      Notification::Complete => observer.complete(),
    }
  }

  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }

  pub fn map<U>(self, f: impl FnOnce(Item) -> U) -> Notification<U, Err> {
    match self {
      Notification::Next(v) => Notification::Next(f(v)),
      Notification::Error(e) => Notification::Error(e),
      Notification::Complete => Notification::Complete,
    }
  }
}
