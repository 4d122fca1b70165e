// catena/src/registry.rs

//! Defines `Registry<H>`, an insertion-ordered, duplicate-free collection
//! of handler identities, and the derivation of single-use runners from it.
//!
//! The registry is generic over the stored handler type `H` (which may be
//! unsized, e.g. `dyn Handle<Ctx>`), so it serves both the canonical
//! `Arc<dyn Handle<Ctx>>` form and any concrete handler type a caller
//! pairs with its own invocation adapter.

use crate::error::{CatenaError, CatenaResult};
use crate::runner::Runner;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{event, Level};

/// An insertion-ordered set of handlers.
///
/// Identity is the `Arc` allocation, never value equality: two
/// structurally identical handlers behind different `Arc`s are distinct
/// entries. Order is the sequence of first insertion and is stable across
/// merges. Once [`freeze`](Registry::freeze)d, the set is immutable for
/// the rest of its lifetime.
pub struct Registry<H: ?Sized> {
  /// Entries in first-insertion order.
  entries: Vec<Arc<H>>,
  /// Identity index for O(1) membership, keyed by the `Arc` data pointer.
  index: HashSet<usize>,
  frozen: bool,
}

impl<H: ?Sized> Registry<H> {
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      entries: Vec::new(),
      index: HashSet::new(),
      frozen: false,
    }
  }

  fn identity(handler: &Arc<H>) -> usize {
    Arc::as_ptr(handler).cast::<()>() as usize
  }

  fn ensure_unfrozen(&self, operation: &'static str) -> CatenaResult<()> {
    if self.frozen {
      event!(Level::WARN, operation, "Mutation attempted on a frozen registry.");
      return Err(CatenaError::Frozen { operation });
    }
    Ok(())
  }

  /// Appends a handler if its identity is not already present.
  ///
  /// Fails with [`CatenaError::Frozen`] if the registry is frozen; the
  /// frozen check happens before any mutation.
  pub fn add(&mut self, handler: Arc<H>) -> CatenaResult<&mut Self> {
    self.ensure_unfrozen("add")?;
    if self.index.insert(Self::identity(&handler)) {
      self.entries.push(handler);
      event!(Level::DEBUG, num_entries = self.entries.len(), "Handler registered.");
    }
    Ok(self)
  }

  /// Appends every handler from `handlers` not already present, preserving
  /// the iterator's order.
  ///
  /// The frozen check happens once up front, so a frozen registry is never
  /// partially mutated.
  pub fn add_all<I>(&mut self, handlers: I) -> CatenaResult<&mut Self>
  where
    I: IntoIterator<Item = Arc<H>>,
  {
    self.ensure_unfrozen("add")?;
    for handler in handlers {
      if self.index.insert(Self::identity(&handler)) {
        self.entries.push(handler);
      }
    }
    Ok(self)
  }

  /// Removes a handler if present. Removal of an unregistered handler is a
  /// no-op, not an error. A frozen registry always fails, regardless of
  /// presence.
  pub fn remove(&mut self, handler: &Arc<H>) -> CatenaResult<()> {
    self.ensure_unfrozen("remove")?;
    let key = Self::identity(handler);
    if self.index.remove(&key) {
      self.entries.retain(|entry| Self::identity(entry) != key);
      event!(Level::DEBUG, num_entries = self.entries.len(), "Handler removed.");
    }
    Ok(())
  }

  /// Returns true if the handler's identity is registered.
  pub fn has(&self, handler: &Arc<H>) -> bool {
    self.index.contains(&Self::identity(handler))
  }

  /// Returns the registered handlers in first-insertion order.
  ///
  /// This is a point-in-time snapshot, not a live view: mutating the
  /// registry afterwards does not affect the returned `Vec`.
  pub fn all(&self) -> Vec<Arc<H>> {
    self.entries.clone()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Removes all entries. Fails if the registry is frozen.
  pub fn clear(&mut self) -> CatenaResult<()> {
    self.ensure_unfrozen("clear")?;
    self.entries.clear();
    self.index.clear();
    Ok(())
  }

  /// Adds every handler from `other` not already present, after the
  /// existing entries and in `other`'s order. Fails if this registry is
  /// frozen; `other` is never mutated.
  pub fn merge(&mut self, other: &Registry<H>) -> CatenaResult<&mut Self> {
    self.ensure_unfrozen("merge")?;
    for handler in &other.entries {
      if self.index.insert(Self::identity(handler)) {
        self.entries.push(Arc::clone(handler));
      }
    }
    event!(Level::DEBUG, num_entries = self.entries.len(), "Registry merged.");
    Ok(self)
  }

  /// Marks the registry permanently immutable. Idempotent: freezing an
  /// already-frozen registry is not an error. There is no unfreeze.
  pub fn freeze(&mut self) {
    if !self.frozen {
      event!(Level::DEBUG, num_entries = self.entries.len(), "Registry frozen.");
    }
    self.frozen = true;
  }

  pub fn is_frozen(&self) -> bool {
    self.frozen
  }

  /// Derives a fresh, single-use [`Runner`] from a snapshot of the current
  /// entries. The runner carries no state across separate derivations, and
  /// later registry mutations do not affect an already-derived runner.
  pub fn runner(&self) -> Runner<H> {
    Runner::new(self.entries.clone().into())
  }
}

impl<H: ?Sized> Default for Registry<H> {
  fn default() -> Self {
    Self::new()
  }
}
