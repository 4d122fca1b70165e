// catena/examples/escalation_chain.rs

use anyhow::anyhow;
use catena::{escalation_handler, BoxFuture, CatenaError, CatenaResult, Context, Escalation};
use tracing::info;

#[derive(Clone, Debug, Default)]
struct DemoContext {
  foobar: Option<String>,
  another: Option<i64>,
  error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CatenaError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Escalation Chain Example ---");

  let mut chain = Escalation::new();

  // A normal forward handler.
  chain.mount(escalation_handler(|ctx: Context<DemoContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      info!("FN: 1");
      ctx.write().foobar = Some("baz".to_string());
      next.resume().await
    });
    fut
  }));

  // Injects an error through its continuation: dispatch jumps to the tail
  // handler, and the handler in between never runs.
  chain.mount(escalation_handler(|_ctx: Context<DemoContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      info!("FN: 2 (escalating)");
      next.escalate(anyhow!("Something went wrong")).await
    });
    fut
  }));

  // Skipped by the jump.
  chain.mount(escalation_handler(|ctx: Context<DemoContext>, next, _error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      info!("FN: 3");
      ctx.write().another = Some(123);
      next.resume().await
    });
    fut
  }));

  // The tail catch-all. Note: after handling the error it may run a second
  // time, error-free, as the cursor catches up behind the jump.
  chain.mount(escalation_handler(|ctx: Context<DemoContext>, next, error| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      info!("FN: 4 (tail), error present: {}", error.is_some());
      if let Some(error) = error {
        ctx.write().error = Some(error.to_string());
      }
      next.resume().await
    });
    fut
  }));

  let ctx = Context::new(DemoContext::default());
  chain.execute(ctx.clone()).await?;

  let state = ctx.read();
  info!("Final context: {:?}", *state);

  assert_eq!(state.foobar.as_deref(), Some("baz"));
  assert_eq!(state.error.as_deref(), Some("Something went wrong"));
  assert_eq!(state.another, None); // FN: 3 never ran

  Ok(())
}
