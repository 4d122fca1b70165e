// catena/src/core/context.rs

//! The shared mutable context threaded through every handler of a chain.

use parking_lot::{
  MappedRwLockReadGuard,
  MappedRwLockWriteGuard,
  RwLock,
  RwLockReadGuard,
  RwLockWriteGuard,
};
use std::sync::Arc;

/// Shared handle to the context payload of a single in-flight execution.
///
/// Handlers communicate only by mutating the payload behind this handle.
/// Cloning the handle is cheap (an `Arc` clone); the payload itself is
/// guarded by a `parking_lot::RwLock`.
///
/// IMPORTANT: lock guards obtained from this handle are blocking and MUST
/// NOT be held across `.await` suspension points.
///
/// One `Context` is owned by exactly one in-flight `run`/`execute`;
/// concurrent executions must not share a single `Context`.
#[derive(Debug)]
pub struct Context<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> Context<T> {
  pub fn new(payload: T) -> Self {
    Context(Arc::new(RwLock::new(payload)))
  }

  /// Acquires a read lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// Acquires a write lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Attempts to acquire a read lock without blocking.
  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  /// Attempts to acquire a write lock without blocking.
  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.0.try_write()
  }

  /// Read guard projected to one part of the payload.
  /// Example: `ctx.map_read(|c| &c.log)`
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Write guard projected to one part of the payload.
  pub fn map_write<F, U: ?Sized>(&self, f: F) -> MappedRwLockWriteGuard<'_, U>
  where
    F: FnOnce(&mut T) -> &mut U,
  {
    RwLockWriteGuard::map(self.write(), f)
  }
}

impl<T: Send + Sync + 'static> Clone for Context<T> {
  fn clone(&self) -> Self {
    Context(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for Context<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}
