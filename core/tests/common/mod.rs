// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use anyhow::anyhow;
use catena::{
  escalation_handler, handler, BoxFuture, CatenaError, CatenaResult, Context, Continuation,
  EscalationHandler, Handle, Next,
};
use std::sync::Arc;
use tracing::Level;

// --- Common Context Struct ---
#[derive(Clone, Debug, Default)]
pub struct ChainContext {
  pub log: Vec<String>,
  pub foobar: Option<String>,
  pub another: Option<i64>,
  pub error: Option<String>,
}

/// The canonical invocation adapter for `Arc<dyn Handle<ChainContext>>`
/// chains: captures the context and forwards to `Handle::handle`.
pub fn invoke_with(
  ctx: Context<ChainContext>,
) -> impl Fn(
  Arc<dyn Handle<ChainContext>>,
  Next<dyn Handle<ChainContext>>,
) -> BoxFuture<'static, CatenaResult<()>>
  + Send
  + Sync
  + 'static {
  move |h, next| {
    let ctx = ctx.clone();
    let fut: BoxFuture<'static, CatenaResult<()>> =
      Box::pin(async move { h.handle(ctx, next).await });
    fut
  }
}

// --- Common Handler Creators ---

/// Appends `label` to the context log, then resumes the chain.
pub fn marker_handler(label: &'static str) -> Arc<dyn Handle<ChainContext>> {
  handler(move |ctx: Context<ChainContext>, next| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().log.push(label.to_string());
      tracing::debug!(target: "test_handlers", %label, "marker executed");
      next.call().await
    });
    fut
  })
}

/// Appends `label` to the context log, then fails without resuming.
pub fn failing_handler(label: &'static str, message: &'static str) -> Arc<dyn Handle<ChainContext>> {
  handler(move |ctx: Context<ChainContext>, _next| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().log.push(label.to_string());
      tracing::warn!(target: "test_handlers", %label, "failing with: '{}'", message);
      Err(CatenaError::Handler {
        source: anyhow!(message),
      })
    });
    fut
  })
}

/// Escalation handler that appends `label` and resumes error-free.
pub fn escalation_marker(label: &'static str) -> EscalationHandler<ChainContext> {
  escalation_handler(
    move |ctx: Context<ChainContext>, next: Continuation<ChainContext>, _error| {
      let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
        ctx.write().log.push(label.to_string());
        next.resume().await
      });
      fut
    },
  )
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
