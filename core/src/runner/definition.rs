// catena/src/runner/definition.rs

//! Contains the `Runner<H>` struct definition and its hook configuration
//! methods. Execution lives in `runner::execution`.

use crate::core::handler::BoxFuture;
use crate::error::CatenaError;
use std::future::Future;
use std::sync::Arc;

/// Hook invoked exactly once when a handler failure is intercepted.
pub(crate) type ErrorHook = Box<dyn FnOnce(CatenaError) -> BoxFuture<'static, ()> + Send>;

/// Hook invoked exactly once when the chain reaches its end cleanly.
pub(crate) type FinalHook = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Executes an ordered handler snapshot via a caller-supplied invocation
/// adapter.
///
/// A runner is derived fresh from a [`Registry`](crate::Registry) snapshot
/// and is single-use: [`run`](Runner::run) consumes it, so one configured
/// runner can never serve two executions (or two contexts) at once.
///
/// Both hooks are unset by default, overwritable, and may be configured in
/// any order before `run`.
pub struct Runner<H: ?Sized> {
  pub(crate) handlers: Arc<[Arc<H>]>,
  pub(crate) error_hook: Option<ErrorHook>,
  pub(crate) final_hook: Option<FinalHook>,
}

impl<H: ?Sized> Runner<H> {
  pub(crate) fn new(handlers: Arc<[Arc<H>]>) -> Self {
    Self {
      handlers,
      error_hook: None,
      final_hook: None,
    }
  }

  /// Sets (overwriting) the error hook. The hook consumes the failure; a
  /// run whose failure was consumed resolves as
  /// [`RunOutcome::Recovered`](crate::RunOutcome::Recovered).
  pub fn error_handler<F, Fut>(mut self, hook: F) -> Self
  where
    F: FnOnce(CatenaError) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    self.error_hook = Some(Box::new(move |error| Box::pin(hook(error))));
    self
  }

  /// Sets (overwriting) the completion hook, invoked only on a clean
  /// traversal to the end of the chain, never after a failure.
  pub fn final_handler<F, Fut>(mut self, hook: F) -> Self
  where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
  {
    self.final_hook = Some(Box::new(move || Box::pin(hook())));
    self
  }

  /// Number of handlers in this runner's snapshot.
  pub fn len(&self) -> usize {
    self.handlers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.handlers.is_empty()
  }
}
