//! Error types for the storage boundary.
//!
//! All storage operations that can fail return a typed [`StoreError`]
//! rather than panicking. Validation failures are rejected synchronously
//! before anything is appended; I/O failures abort the operation and leave
//! the in-memory snapshot at its last consistent state.

/// Errors that can occur at the event store boundary.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Malformed ingestion input, rejected before append.
    ///
    /// Never retried automatically; the caller must correct and resubmit.
    #[error("validation error: {reason}")]
    Validation {
        /// What was wrong with the submitted event.
        reason: String,
    },

    /// An I/O failure on append or load.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be serialized for the log.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Convenience constructor for validation failures.
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
