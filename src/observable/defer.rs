use crate::{observable::Observable, subscriber::Subscriber};

/// Creates an observable that will on subscription defer to another observable
/// that is supplied by a supplier-function which will be run once at each
/// subscription
///
/// ```rust
/// # use rxmarble::prelude::*;
///
/// observable::defer(|| {
///   println!("Hi!");
///   observable::of::<_, ()>("Hello!")
/// })
///   .subscribe(move |v| {
///     println!("{}", v);
///   });
/// // Prints: Hi!\nHello!\n
/// ```
pub fn defer<F, Item, Err>(observable_supplier: F) -> Observable<Item, Err>
where
  F: Fn() -> Observable<Item, Err> + 'static,
  Item: 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<Item, Err>| observable_supplier().subscribe_with(subscriber))
}
