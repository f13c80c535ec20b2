// bikeshop/src/flow/state.rs

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::Arc;

/// Shared, lockable state for a flow run or a controller's mounted view.
///
/// Guards are blocking locks and must be dropped before any `.await`.
#[derive(Debug)]
pub struct SharedState<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> SharedState<T> {
  pub fn new(value: T) -> Self {
    SharedState(Arc::new(RwLock::new(value)))
  }

  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Swaps in `value` wholesale and returns what was there.
  pub fn replace(&self, value: T) -> T {
    std::mem::replace(&mut *self.0.write(), value)
  }
}

impl<T: Clone + Send + Sync + 'static> SharedState<T> {
  pub fn snapshot(&self) -> T {
    self.0.read().clone()
  }
}

impl<T: Send + Sync + 'static> Clone for SharedState<T> {
  fn clone(&self) -> Self {
    SharedState(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for SharedState<T> {
  fn default() -> Self {
    Self::new(T::default())
  }
}
