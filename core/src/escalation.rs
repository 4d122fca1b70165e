// catena/src/escalation.rs

//! The escalation pipeline: an ordered handler list walked by
//! continuation-passing, where an explicitly injected error redirects the
//! next step to the tail handler of the chain.
//!
//! Dispatch keeps an explicit cursor into a snapshot of the handler stack
//! instead of re-slicing a list per step; the effect is identical to the
//! "drop the first remaining handler, then pick first-or-last" rule:
//!
//! 1. If the cursor is past the end, terminate silently (no completion
//!    hook exists in this variant).
//! 2. Target the tail handler when an error was injected, otherwise the
//!    handler at the cursor.
//! 3. Invoke the target with the context, a continuation whose cursor is
//!    advanced by one, and the injected error (if any).
//!
//! Because the cursor advances by one regardless of which handler was
//! targeted, a jump to the tail leaves the cursor behind it; as the
//! error-free continuation chain unwinds further, the tail can be invoked
//! a second time. That re-invocation is a documented property of the
//! algorithm and is preserved here, as is the asymmetry that a handler
//! failing by returning `Err` directly (rather than via
//! [`Continuation::escalate`]) is not intercepted at all: it propagates
//! straight out of [`Escalation::execute`], skipping every later handler
//! including the tail.

use crate::core::context::Context;
use crate::core::handler::BoxFuture;
use crate::error::CatenaResult;

use std::sync::Arc;
use tracing::{event, instrument, Level};

/// A handler in an escalation chain.
///
/// Invoked with the shared context, the continuation, and the error
/// injected by the previous handler (if any). Only the tail handler ever
/// observes a non-`None` error.
pub type EscalationHandler<Ctx> = Arc<
  dyn Fn(Context<Ctx>, Continuation<Ctx>, Option<anyhow::Error>) -> BoxFuture<'static, CatenaResult<()>>
    + Send
    + Sync,
>;

/// Wraps a bare closure into an [`EscalationHandler`].
pub fn escalation_handler<Ctx, F>(f: F) -> EscalationHandler<Ctx>
where
  Ctx: Send + Sync + 'static,
  F: Fn(Context<Ctx>, Continuation<Ctx>, Option<anyhow::Error>) -> BoxFuture<'static, CatenaResult<()>>
    + Send
    + Sync
    + 'static,
{
  Arc::new(f)
}

/// An ordered escalation chain.
///
/// Unlike [`Registry`](crate::Registry), the chain is a plain list:
/// mounting the same handler twice runs it twice.
pub struct Escalation<Ctx: Send + Sync + 'static> {
  stack: Vec<EscalationHandler<Ctx>>,
}

impl<Ctx: Send + Sync + 'static> Escalation<Ctx> {
  /// Creates an empty escalation chain.
  pub fn new() -> Self {
    Self { stack: Vec::new() }
  }

  /// Creates a chain pre-populated with `handlers`, in order.
  pub fn with_handlers<I>(handlers: I) -> Self
  where
    I: IntoIterator<Item = EscalationHandler<Ctx>>,
  {
    Self {
      stack: handlers.into_iter().collect(),
    }
  }

  /// Appends a handler to the chain.
  pub fn mount(&mut self, handler: EscalationHandler<Ctx>) -> &mut Self {
    self.stack.push(handler);
    self
  }

  /// Appends every handler from `handlers`, in order.
  pub fn mount_all<I>(&mut self, handlers: I) -> &mut Self
  where
    I: IntoIterator<Item = EscalationHandler<Ctx>>,
  {
    self.stack.extend(handlers);
    self
  }

  pub fn len(&self) -> usize {
    self.stack.len()
  }

  pub fn is_empty(&self) -> bool {
    self.stack.is_empty()
  }

  /// Walks the chain against `ctx`, starting error-free at the head.
  ///
  /// An empty chain terminates silently. A direct `Err` from any handler
  /// propagates out of this call unmodified.
  #[instrument(
        name = "Escalation::execute",
        skip_all,
        fields(
            context_type = %std::any::type_name::<Ctx>(),
            num_handlers = self.stack.len(),
        ),
        err(Display)
    )]
  pub async fn execute(&self, ctx: Context<Ctx>) -> CatenaResult<()> {
    event!(Level::DEBUG, "Escalation dispatch starting.");
    let stack: Arc<[EscalationHandler<Ctx>]> = self.stack.clone().into();
    dispatch(stack, ctx, 0, None).await
  }
}

impl<Ctx: Send + Sync + 'static> Default for Escalation<Ctx> {
  fn default() -> Self {
    Self::new()
  }
}

/// Continuation handed to an escalation handler.
///
/// [`resume`](Continuation::resume) carries the chain forward error-free;
/// [`escalate`](Continuation::escalate) injects an error, redirecting the
/// next step to the tail handler.
pub struct Continuation<Ctx: Send + Sync + 'static> {
  stack: Arc<[EscalationHandler<Ctx>]>,
  ctx: Context<Ctx>,
  cursor: usize,
}

impl<Ctx: Send + Sync + 'static> Continuation<Ctx> {
  /// Resumes the chain with no error.
  pub fn resume(self) -> BoxFuture<'static, CatenaResult<()>> {
    dispatch(self.stack, self.ctx, self.cursor, None)
  }

  /// Resumes the chain with an injected error; the next step targets the
  /// tail handler, which receives `error` as its third argument.
  pub fn escalate(self, error: anyhow::Error) -> BoxFuture<'static, CatenaResult<()>> {
    dispatch(self.stack, self.ctx, self.cursor, Some(error))
  }
}

fn dispatch<Ctx: Send + Sync + 'static>(
  stack: Arc<[EscalationHandler<Ctx>]>,
  ctx: Context<Ctx>,
  cursor: usize,
  error: Option<anyhow::Error>,
) -> BoxFuture<'static, CatenaResult<()>> {
  Box::pin(async move {
    if cursor >= stack.len() {
      event!(Level::DEBUG, "Escalation chain exhausted.");
      return Ok(());
    }

    // On an injected error, jump to the tail handler of the chain; the
    // cursor still advances by one below.
    let target = if error.is_some() { stack.len() - 1 } else { cursor };
    event!(
      Level::TRACE,
      cursor,
      target,
      escalating = error.is_some(),
      "Dispatching escalation handler."
    );

    let handler = Arc::clone(&stack[target]);
    let next = Continuation {
      stack: Arc::clone(&stack),
      ctx: ctx.clone(),
      cursor: cursor + 1,
    };
    handler(ctx, next, error).await
  })
}
