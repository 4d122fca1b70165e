// catena/src/runner/mod.rs

//! The chain dispatcher: executes a registry snapshot strictly in order
//! through a caller-supplied invocation adapter, with configurable error
//! and completion hooks.

pub mod definition;
pub mod execution;

pub use definition::Runner;
pub use execution::{Executor, Next};
