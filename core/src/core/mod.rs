pub mod context;
pub mod control;
pub mod handler;

// Re-export key types for easier access from other catena modules (and lib.rs)
pub use context::Context;
pub use control::RunOutcome;
pub use handler::{handler, BoxFuture, Handle};
