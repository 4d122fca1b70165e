// catena/src/core/control.rs

//! The outcome of a full chain dispatch.

/// Outcome of a `Runner::run` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
  /// Every handler invoked its continuation and the chain reached the end
  /// cleanly; the completion hook (if configured) has fired exactly once.
  Completed,
  /// A handler failed and the configured error hook consumed the failure.
  /// Handlers past the failure point never ran; the completion hook did
  /// not fire.
  Recovered,
}
