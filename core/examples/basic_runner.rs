// catena/examples/basic_runner.rs

use catena::{handler, BoxFuture, CatenaError, CatenaResult, Context, Handle, Registry, RunOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

// 1. Define the context payload for the chain
#[derive(Clone, Debug, Default)]
struct DemoContext {
  stack: Vec<String>,
}

// 2. A small factory for "onion" handlers that record work both before and
//    after delegating to the rest of the chain.
fn wrapping_handler(label: &'static str) -> Arc<dyn Handle<DemoContext>> {
  handler(move |ctx: Context<DemoContext>, next| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      info!("FN: {label}");
      ctx.write().stack.push(format!("{label} UP"));
      next.call().await?;
      ctx.write().stack.push(format!("{label} AFTER"));
      info!("FN: {label} AFTER");
      Ok(())
    });
    fut
  })
}

#[tokio::main]
async fn main() -> Result<(), CatenaError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Runner Example ---");

  // 3. Register handlers, in order
  let mut registry: Registry<dyn Handle<DemoContext>> = Registry::new();
  registry.add(wrapping_handler("1"))?;
  registry.add(wrapping_handler("2"))?;
  registry.add(handler(|ctx: Context<DemoContext>, next| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().stack.push("3 UP".to_string());
      // A handler may suspend before resuming the chain; the dispatcher
      // waits with it.
      tokio::time::sleep(Duration::from_millis(200)).await;
      next.call().await?;
      ctx.write().stack.push("3 AFTER".to_string());
      Ok(())
    });
    fut
  }))?;

  // 4. Create the context and derive a single-use runner
  let ctx = Context::new(DemoContext::default());
  let error_ctx = ctx.clone();
  let final_ctx = ctx.clone();

  let outcome = registry
    .runner()
    .error_handler(move |error: CatenaError| async move {
      tracing::error!(%error, "chain failed");
      error_ctx.write().stack.push("error handler".to_string());
    })
    .final_handler(move || async move {
      tracing::warn!("FINAL HANDLER");
      final_ctx.write().stack.push("final handler".to_string());
    })
    .run({
      let ctx = ctx.clone();
      move |h, next| {
        let ctx = ctx.clone();
        let fut: BoxFuture<'static, CatenaResult<()>> =
          Box::pin(async move { h.handle(ctx, next).await });
        fut
      }
    })
    .await?;

  // 5. Inspect the results
  match outcome {
    RunOutcome::Completed => info!("Chain completed cleanly."),
    RunOutcome::Recovered => info!("Chain failed; the error hook consumed the failure."),
  }

  let final_state = ctx.read();
  info!("Execution stack:");
  for entry in &final_state.stack {
    info!("- {}", entry);
  }

  assert_eq!(
    final_state.stack,
    vec!["1 UP", "2 UP", "3 UP", "final handler", "3 AFTER", "2 AFTER", "1 AFTER"]
  );

  Ok(())
}
