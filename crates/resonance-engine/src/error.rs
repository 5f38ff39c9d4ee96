//! Error types for the computation layer.
//!
//! The pure functions themselves cannot fail -- they are total over their
//! inputs. What can fail is the query boundary: parameters that make no
//! sense (a negative window, a zero pattern length) are rejected with a
//! descriptive [`EngineError`] before any computation runs.

/// Errors that can occur when validating query parameters.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A query parameter is out of range or inconsistent.
    #[error("invalid query: {reason}")]
    InvalidQuery {
        /// Explanation of what is wrong with the parameters.
        reason: String,
    },
}

impl EngineError {
    /// Convenience constructor for invalid-query errors.
    pub fn invalid_query(reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            reason: reason.into(),
        }
    }
}
