//! Error types for the service facade.

use resonance_engine::EngineError;
use resonance_store::StoreError;

/// Errors surfaced at the service boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Ingestion input was rejected before reaching the store.
    #[error("invalid input: {reason}")]
    Validation {
        /// Explanation of what is wrong with the input.
        reason: String,
    },

    /// The event log failed underneath the service.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),

    /// Query parameters were out of range or inconsistent.
    #[error("query error: {0}")]
    Query(#[from] EngineError),

    /// The store lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl ServiceError {
    /// Convenience constructor for validation errors.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
