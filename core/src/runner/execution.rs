// catena/src/runner/execution.rs

//! Contains `Runner::run()` and the `Next<H>` continuation driving the
//! ordered dispatch of a handler snapshot.

use crate::core::control::RunOutcome;
use crate::core::handler::BoxFuture;
use crate::error::CatenaResult;
use crate::runner::definition::{FinalHook, Runner};

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// The invocation adapter bridging the dispatcher's abstract two-argument
/// protocol to a handler's concrete call signature.
///
/// For handler `h` at index `i` the dispatcher invokes `adapter(h, next)`;
/// the adapter decides how `h` is actually called and when (if at all) the
/// continuation is driven. This indirection is what lets one dispatcher
/// serve handlers with arbitrary signatures.
pub type Executor<H> =
  Arc<dyn Fn(Arc<H>, Next<H>) -> BoxFuture<'static, CatenaResult<()>> + Send + Sync>;

/// Zero-argument continuation handed to the invocation adapter.
///
/// Invoking [`call`](Next::call) advances dispatch to the next handler in
/// snapshot order. When the snapshot is exhausted, the completion hook is
/// taken out of its shared slot and fired, so it runs at most once per
/// execution even if a handler drives its continuation more than once.
pub struct Next<H: ?Sized> {
  handlers: Arc<[Arc<H>]>,
  index: usize,
  executor: Executor<H>,
  final_hook: Arc<Mutex<Option<FinalHook>>>,
}

impl<H: ?Sized + Send + Sync + 'static> Next<H> {
  /// Resumes the chain at this continuation's index.
  pub fn call(self) -> BoxFuture<'static, CatenaResult<()>> {
    Box::pin(async move {
      if self.index >= self.handlers.len() {
        // Clean traversal reached the end. The guard is dropped before the
        // hook future is awaited.
        let hook = self.final_hook.lock().take();
        if let Some(hook) = hook {
          event!(Level::DEBUG, "Chain completed; invoking completion hook.");
          hook().await;
        }
        return Ok(());
      }

      event!(Level::TRACE, index = self.index, "Dispatching handler.");
      let handler = Arc::clone(&self.handlers[self.index]);
      let next = Next {
        handlers: Arc::clone(&self.handlers),
        index: self.index + 1,
        executor: Arc::clone(&self.executor),
        final_hook: Arc::clone(&self.final_hook),
      };
      (self.executor)(handler, next).await
    })
  }
}

impl<H: ?Sized + Send + Sync + 'static> Runner<H> {
  /// Executes the snapshot strictly in order, beginning at index 0.
  ///
  /// If any invocation fails, forward progression stops immediately:
  /// handlers past the failure point never run. The failure is then routed
  /// through the error hook exactly once, resolving as
  /// `Ok(RunOutcome::Recovered)`; with no hook configured it propagates as
  /// `Err` to the caller. An empty snapshot fires the completion hook
  /// immediately and resolves as `Ok(RunOutcome::Completed)`.
  #[instrument(
        name = "Runner::run",
        skip_all,
        fields(num_handlers = self.handlers.len()),
        err(Display)
    )]
  pub async fn run<F>(mut self, executor: F) -> CatenaResult<RunOutcome>
  where
    F: Fn(Arc<H>, Next<H>) -> BoxFuture<'static, CatenaResult<()>> + Send + Sync + 'static,
  {
    event!(Level::DEBUG, "Chain dispatch starting.");
    let executor: Executor<H> = Arc::new(executor);
    let entry = Next {
      handlers: Arc::clone(&self.handlers),
      index: 0,
      executor,
      final_hook: Arc::new(Mutex::new(self.final_hook.take())),
    };

    match entry.call().await {
      Ok(()) => {
        event!(Level::DEBUG, "Chain dispatch finished cleanly.");
        Ok(RunOutcome::Completed)
      }
      Err(error) => match self.error_hook.take() {
        Some(hook) => {
          event!(Level::INFO, %error, "Handler failed; routing through error hook.");
          hook(error).await;
          Ok(RunOutcome::Recovered)
        }
        None => {
          event!(Level::ERROR, %error, "Handler failed with no error hook configured.");
          Err(error)
        }
      },
    }
  }
}
