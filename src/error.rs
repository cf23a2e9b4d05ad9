use std::fmt;

use crate::types::Domain;

/// Unified error type for the chartpilot crate.
#[derive(Debug, Clone)]
pub enum DispatchError {
    /// Invalid input provided by the caller.
    InvalidInput(String),
    /// An action was routed to a consumer for a different domain.
    DomainMismatch { expected: Domain, got: Domain },
    /// Internal error.
    Internal(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            DispatchError::DomainMismatch { expected, got } => {
                write!(f, "domain mismatch: consumer handles {expected}, action is {got}")
            }
            DispatchError::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Result type alias using [`DispatchError`].
pub type DispatchResult<T> = Result<T, DispatchError>;
