// tests/escalation_tests.rs
mod common;

use anyhow::anyhow;
use catena::{escalation_handler, BoxFuture, CatenaError, CatenaResult, Context, Escalation};
use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_single_handler_forward_dispatch() {
  setup_tracing();
  let chain = Escalation::with_handlers([escalation_handler(
    |ctx: Context<ChainContext>, next, _error| {
      let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
        ctx.write().foobar = Some("baz".to_string());
        next.resume().await
      });
      fut
    },
  )]);

  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().foobar.as_deref(), Some("baz"));
}

#[tokio::test]
async fn test_forward_chain_with_suspension_points() {
  setup_tracing();
  let mut chain = Escalation::new();
  chain.mount(escalation_marker("first"));
  chain.mount(escalation_handler(|ctx: Context<ChainContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().another = Some(123);
      tokio::time::sleep(std::time::Duration::from_millis(20)).await;
      next.resume().await
    });
    fut
  }));
  chain.mount(escalation_marker("third"));

  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.log, vec!["first", "third"]);
  assert_eq!(guard.another, Some(123));
}

#[tokio::test]
async fn test_injected_error_jumps_to_tail_handler() {
  setup_tracing();
  let tail_invocations = Arc::new(AtomicUsize::new(0));
  let tail_counter = Arc::clone(&tail_invocations);

  let mut chain = Escalation::new();
  // m0: normal forward handler.
  chain.mount(escalation_handler(|ctx: Context<ChainContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().foobar = Some("baz".to_string());
      next.resume().await
    });
    fut
  }));
  // e1: injects an error through its continuation.
  chain.mount(escalation_handler(|_ctx: Context<ChainContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> =
      Box::pin(async move { next.escalate(anyhow!("This is an error")).await });
    fut
  }));
  // e2: must never run forward; the injected error jumps past it.
  chain.mount(escalation_handler(|ctx: Context<ChainContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().another = Some(123);
      next.resume().await
    });
    fut
  }));
  // e3: the tail catch-all.
  chain.mount(escalation_handler(
    move |ctx: Context<ChainContext>, next, error| {
      let tail_counter = Arc::clone(&tail_counter);
      let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
        tail_counter.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = error {
          ctx.write().error = Some(error.to_string());
        }
        next.resume().await
      });
      fut
    },
  ));

  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.foobar.as_deref(), Some("baz"));
  assert_eq!(guard.error.as_deref(), Some("This is an error"));
  // e2 sat between the injection point and the tail: it never ran.
  assert_eq!(guard.another, None);
  // The tail runs once with the error and once more, error-free, as the
  // cursor catches up behind the jump.
  assert_eq!(tail_invocations.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_direct_failure_is_not_intercepted() {
  setup_tracing();
  let mut chain = Escalation::new();
  chain.mount(escalation_marker("first"));
  // Fails by returning Err directly instead of escalating through the
  // continuation.
  chain.mount(escalation_handler(|_ctx: Context<ChainContext>, _next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      Err(CatenaError::Handler {
        source: anyhow!("ambient failure"),
      })
    });
    fut
  }));
  // The tail catch-all never observes a direct failure.
  chain.mount(escalation_handler(|ctx: Context<ChainContext>, next, error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().log.push("tail".to_string());
      if let Some(error) = error {
        ctx.write().error = Some(error.to_string());
      }
      next.resume().await
    });
    fut
  }));

  let ctx = Context::new(ChainContext::default());
  let result = chain.execute(ctx.clone()).await;

  match result {
    Err(CatenaError::Handler { source }) => {
      assert_eq!(source.to_string(), "ambient failure");
    }
    other => panic!("Expected the direct failure to propagate, got {:?}", other),
  }
  let guard = ctx.read();
  assert_eq!(guard.log, vec!["first"]);
  assert_eq!(guard.error, None);
}

#[tokio::test]
async fn test_empty_chain_terminates_silently() {
  setup_tracing();
  let chain: Escalation<ChainContext> = Escalation::new();
  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();
  assert!(ctx.read().log.is_empty());
}

#[tokio::test]
async fn test_duplicates_are_permitted() {
  setup_tracing();
  let mut chain = Escalation::new();
  let marker = escalation_marker("again");
  chain.mount_all([marker.clone(), marker]);
  assert_eq!(chain.len(), 2);

  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().log, vec!["again", "again"]);
}

#[tokio::test]
async fn test_not_resuming_ends_traversal() {
  setup_tracing();
  let mut chain = Escalation::new();
  chain.mount(escalation_marker("first"));
  chain.mount(escalation_handler(|ctx: Context<ChainContext>, _next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().log.push("sink".to_string());
      Ok(())
    });
    fut
  }));
  chain.mount(escalation_marker("never"));

  let ctx = Context::new(ChainContext::default());
  chain.execute(ctx.clone()).await.unwrap();

  assert_eq!(ctx.read().log, vec!["first", "sink"]);
}
