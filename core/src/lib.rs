// src/lib.rs

//! Catena: a composable execution pipeline for Rust.
//!
//! Catena threads a shared mutable context through an ordered chain of
//! handlers, giving each handler the ability to delegate to the rest of
//! the chain, to short-circuit on error, and to be notified when the whole
//! chain completes. It provides:
//!  - A [`Registry`]: an ordered, duplicate-free handler collection with
//!    one-way freezing.
//!  - A [`Runner`]: a single-use chain dispatcher driven by a
//!    caller-supplied invocation adapter, with configurable error and
//!    completion hooks.
//!  - An [`Escalation`] pipeline: a continuation-passing chain where an
//!    injected error jumps dispatch to the tail handler.

// Declare modules according to the planned structure
pub mod core;
pub mod runner;
pub mod escalation;
pub mod registry;
pub mod error;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::context::Context;
pub use crate::core::control::RunOutcome;
pub use crate::core::handler::{handler, BoxFuture, Handle};

pub use crate::error::{CatenaError, CatenaResult};

pub use crate::registry::Registry;
pub use crate::runner::{Executor, Next, Runner};

pub use crate::escalation::{escalation_handler, Continuation, Escalation, EscalationHandler};

/*
    Core Workflow (Runner variant):
    1. Define a context struct `MyCtx` for your chain.
    2. Build a `Registry<dyn Handle<MyCtx>>` and `add` handlers, either via
       `handler(|ctx, next| ...)` or as structs implementing `Handle<MyCtx>`.
    3. Derive a runner with `registry.runner()`, optionally configure
       `.error_handler(..)` / `.final_handler(..)`.
    4. Create a `Context::new(MyCtx { .. })` and call
       `runner.run(|h, next| { let ctx = ctx.clone(); Box::pin(async move {
       h.handle(ctx, next).await }) }).await`.

    Escalation variant:
    1. Build an `Escalation<MyCtx>` and `mount` handlers.
    2. A handler calls `next.resume()` to continue, or
       `next.escalate(err)` to jump the chain to its tail handler.
    3. Call `escalation.execute(ctx).await`.
*/
