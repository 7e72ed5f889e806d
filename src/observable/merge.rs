use crate::observable::{from_iter, Observable};

/// Subscribes to every source at once and forwards their values as they
/// arrive. Completes after the last source completed; the first error ends
/// everything.
pub fn merge<Item, Err>(sources: impl IntoIterator<Item = Observable<Item, Err>>) -> Observable<Item, Err>
where
  Item: 'static,
  Err: 'static,
{
  let sources: Vec<_> = sources.into_iter().collect();
  from_iter::<_, Err>(sources).merge_all(usize::MAX)
}

impl<Item: 'static, Err: 'static> Observable<Item, Err> {
  /// Interleaves this stream with `other`.
  pub fn merge_with(self, other: Observable<Item, Err>) -> Observable<Item, Err> { merge([self, other]) }
}
