use std::{
  cell::{Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

/// Shared, interior-mutable state owned by one subscription chain.
///
/// Operators keep their per-subscription state in a `MutRc` so the observers
/// they hand to upstream sources and the teardown they hand downstream can
/// both reach it.
#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

/// Non-owning counterpart of [`MutRc`], used by teardown closures that must
/// not keep their owner alive.
pub struct WeakMutRc<T>(Weak<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  /// Mutable access that yields `None` instead of panicking while the value is
  /// already borrowed further up the stack.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<RefMut<'_, T>> { self.0.try_borrow_mut().ok() }

  pub fn downgrade(&self) -> WeakMutRc<T> { WeakMutRc(Rc::downgrade(&self.0)) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakMutRc<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakMutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutRc<T> {
  #[inline]
  fn from(v: T) -> Self { MutRc::own(v) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shared_mutation() {
    let a = MutRc::own(vec![1]);
    let b = a.clone();
    b.rc_deref_mut().push(2);
    assert_eq!(*a.rc_deref(), vec![1, 2]);
    assert!(a.ptr_eq(&b));
  }

  #[test]
  fn try_borrow_while_borrowed() {
    let a = MutRc::own(0);
    let _guard = a.rc_deref_mut();
    assert!(a.try_rc_deref_mut().is_none());
  }

  #[test]
  fn weak_does_not_keep_alive() {
    let a = MutRc::own(1);
    let weak = a.downgrade();
    assert!(weak.upgrade().is_some());
    drop(a);
    assert!(weak.upgrade().is_none());
  }
}
