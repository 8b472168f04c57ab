//! Core error types.

use thiserror::Error;

use crate::store::cache::CacheError;

/// Application-level error type.
///
/// `Remote` is the only variant the fallback decorator recovers from;
/// the other variants are authoritative answers and propagate as-is.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced employee or identifier does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin attempted to start a session for an employee that already
    /// has an open one.
    #[error("Session already open for employee {0}")]
    AlreadyOpen(String),

    /// Attempted to end a session when none is open for that employee.
    #[error("No open session: {0}")]
    NoOpen(String),

    /// Admin login mismatch or rejected bearer token.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// Network or backend failure; recoverable via the local cache.
    #[error("Remote unavailable: {0}")]
    Remote(String),

    /// The backend answered with a shape we cannot interpret.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// True when the error is a transport-level remote failure the
    /// fallback store may recover from locally.
    pub fn is_remote(&self) -> bool {
        matches!(self, CoreError::Remote(_))
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
