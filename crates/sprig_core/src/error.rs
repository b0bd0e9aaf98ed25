//! Runtime lifecycle errors

use thiserror::Error;

/// Errors raised when a component operation is called in the wrong
/// lifecycle state
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// A mutating operation was called after `teardown`
    #[error("component is torn down: {op} is no longer valid")]
    TornDown {
        /// The operation that was rejected
        op: &'static str,
    },

    /// `mount` was called on an already-mounted component
    #[error("component is already mounted")]
    AlreadyMounted,
}

/// Result type for component lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
