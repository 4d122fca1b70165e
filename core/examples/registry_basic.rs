// catena/examples/registry_basic.rs

use catena::{handler, BoxFuture, CatenaError, CatenaResult, Context, Handle, Registry};
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Debug, Default)]
struct AuditContext {
  entries: Vec<String>,
}

fn audit_handler(label: &'static str) -> Arc<dyn Handle<AuditContext>> {
  handler(move |ctx: Context<AuditContext>, next| {
    let fut: BoxFuture<'static, CatenaResult<()>> = Box::pin(async move {
      ctx.write().entries.push(label.to_string());
      next.call().await
    });
    fut
  })
}

#[tokio::main]
async fn main() -> Result<(), CatenaError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Registry Example ---");

  let validate = audit_handler("validate");
  let persist = audit_handler("persist");
  let notify = audit_handler("notify");

  let mut registry: Registry<dyn Handle<AuditContext>> = Registry::new();
  registry.add(validate.clone())?;
  registry.add(persist.clone())?;
  // Re-adding an already-registered identity is a silent no-op.
  registry.add(validate.clone())?;
  info!("Registered handlers: {}", registry.len());

  // A second registry merged in: the identity-union, no duplicates.
  let mut extras: Registry<dyn Handle<AuditContext>> = Registry::new();
  extras.add(persist.clone())?;
  extras.add(notify.clone())?;
  registry.merge(&extras)?;
  info!("After merge: {}", registry.len());

  registry.remove(&persist)?;
  assert!(!registry.has(&persist));

  // Freeze before handing the registry to anything concurrent; all
  // mutating calls now fail, reads keep working.
  registry.freeze();
  match registry.add(audit_handler("late")) {
    Err(CatenaError::Frozen { operation }) => info!("Rejected late '{}' as expected", operation),
    _ => unreachable!("frozen registry accepted a mutation"),
  }

  let ctx = Context::new(AuditContext::default());
  registry
    .runner()
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

  info!("Audit entries: {:?}", ctx.read().entries);
  assert_eq!(ctx.read().entries, vec!["validate", "notify"]);

  Ok(())
}
