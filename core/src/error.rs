// catena/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatenaError {
  /// A mutating registry call was made after `freeze()`.
  #[error("Handler registry is frozen. Cannot {operation} handlers")]
  Frozen { operation: &'static str },

  /// A handler (or its invocation adapter) failed during chain dispatch.
  #[error("Error in user-provided handler or invocation adapter. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },
}

// The key conversion catena provides for external errors: any anyhow-wrapped
// failure surfacing from a handler becomes a dispatch failure. An unhandled
// failure (no error hook configured on the runner, or a direct `Err` return
// inside an escalation chain) reaches the caller as this same variant.
impl From<AnyhowError> for CatenaError {
  fn from(err: AnyhowError) -> Self {
    CatenaError::Handler { source: err }
  }
}

pub type CatenaResult<T, E = CatenaError> = std::result::Result<T, E>;
