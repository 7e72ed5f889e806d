use crate::{observable::Observable, observer::Observer, rc::MutRc, subscriber::Subscriber};

/// Waits for every source to complete and emits their last values as one
/// `Vec`, in source order.
///
/// If a source completes without producing a value the result completes
/// without emitting. An empty list completes immediately. The first error
/// wins and cancels the remaining sources.
pub fn fork_join<Item, Err>(sources: Vec<Observable<Item, Err>>) -> Observable<Vec<Item>, Err>
where
  Item: 'static,
  Err: 'static,
{
  Observable::new(move |subscriber: Subscriber<Vec<Item>, Err>| {
    if sources.is_empty() {
      subscriber.complete();
      return;
    }
    let state = MutRc::own(ForkJoinState {
      last: sources.iter().map(|_| None).collect(),
      completed: 0,
    });
    for (index, source) in sources.iter().enumerate() {
      let observer = ForkJoinObserver { index, state: state.clone(), subscriber: subscriber.clone() };
      subscriber.add(source.subscribe_with(observer));
    }
  })
}

struct ForkJoinState<Item> {
  last: Vec<Option<Item>>,
  completed: usize,
}

struct ForkJoinObserver<Item, Err> {
  index: usize,
  state: MutRc<ForkJoinState<Item>>,
  subscriber: Subscriber<Vec<Item>, Err>,
}

impl<Item: 'static, Err: 'static> Observer<Item, Err> for ForkJoinObserver<Item, Err> {
  fn next(&mut self, value: Item) { self.state.rc_deref_mut().last[self.index] = Some(value); }

  fn error(&mut self, err: Err) { self.subscriber.error(err) }

  fn complete(&mut self) {
    let result = {
      let mut state = self.state.rc_deref_mut();
      if state.last[self.index].is_none() {
        None
      } else {
        state.completed += 1;
        if state.completed < state.last.len() {
          return;
        }
        state.last.iter_mut().map(Option::take).collect::<Option<Vec<_>>>()
      }
    };
    if let Some(values) = result {
      self.subscriber.next(values);
    }
    self.subscriber.complete();
  }

  fn is_closed(&self) -> bool { self.subscriber.is_closed() }
}
