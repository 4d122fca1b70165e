// catena/src/core/handler.rs

//! The canonical handler form and the normalization of bare invocables
//! into it.
//!
//! A handler comes in one of two shapes: a bare async closure, or a
//! capability object implementing [`Handle`]. Both are normalized into an
//! `Arc<dyn Handle<Ctx>>` at registration time, so the dispatcher core
//! only ever sees a single calling convention. The `Arc` allocation also
//! serves as the handler's identity token inside the registry; identity is
//! never value equality.

use crate::core::context::Context;
use crate::error::CatenaResult;
use crate::runner::execution::Next;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future alias used throughout the crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The capability-object handler shape.
///
/// A handler receives a clone of the shared [`Context`] handle and a
/// [`Next`] continuation; invoking the continuation resumes the chain.
/// Not invoking it ends the traversal silently (without the completion
/// hook), and returning `Err` short-circuits the chain.
#[async_trait]
pub trait Handle<Ctx>: Send + Sync
where
  Ctx: Send + Sync + 'static,
{
  async fn handle(&self, ctx: Context<Ctx>, next: Next<dyn Handle<Ctx>>) -> CatenaResult<()>;
}

/// Adapter wrapping a bare invocable into the [`Handle`] shape.
///
/// Kept private: construction goes through [`handler`], which hands back
/// the canonical `Arc<dyn Handle<Ctx>>` form directly.
struct FnHandler<F>(F);

#[async_trait]
impl<Ctx, F> Handle<Ctx> for FnHandler<F>
where
  Ctx: Send + Sync + 'static,
  F: Fn(Context<Ctx>, Next<dyn Handle<Ctx>>) -> BoxFuture<'static, CatenaResult<()>> + Send + Sync,
{
  async fn handle(&self, ctx: Context<Ctx>, next: Next<dyn Handle<Ctx>>) -> CatenaResult<()> {
    (self.0)(ctx, next).await
  }
}

/// Normalizes a bare async closure into the canonical handler form.
///
/// Each call mints a fresh `Arc` allocation, so two handlers built from
/// structurally identical closures are distinct registry entries.
pub fn handler<Ctx, F>(f: F) -> Arc<dyn Handle<Ctx>>
where
  Ctx: Send + Sync + 'static,
  F: Fn(Context<Ctx>, Next<dyn Handle<Ctx>>) -> BoxFuture<'static, CatenaResult<()>>
    + Send
    + Sync
    + 'static,
{
  Arc::new(FnHandler(f))
}
