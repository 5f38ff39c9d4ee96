//! Query parameter validation.
//!
//! Invalid parameters are rejected with a descriptive message; missing
//! optional parameters fall back to documented defaults at the facade,
//! never to silent zero or empty substitution.

use crate::error::EngineError;

/// Validate a lookback window in hours.
///
/// # Errors
///
/// Returns [`EngineError::InvalidQuery`] when the window is not a finite,
/// strictly positive number.
pub fn validate_window(window_hours: f64) -> Result<(), EngineError> {
    if !window_hours.is_finite() {
        return Err(EngineError::invalid_query(format!(
            "window_hours must be finite, got {window_hours}"
        )));
    }
    if window_hours <= 0.0 {
        return Err(EngineError::invalid_query(format!(
            "window_hours must be positive, got {window_hours}"
        )));
    }
    Ok(())
}

/// Validate pattern detection length bounds.
///
/// # Errors
///
/// Returns [`EngineError::InvalidQuery`] when `min_length < 1` or
/// `min_length > max_length`.
pub fn validate_pattern_bounds(min_length: usize, max_length: usize) -> Result<(), EngineError> {
    if min_length < 1 {
        return Err(EngineError::invalid_query(
            "min_length must be at least 1".to_owned(),
        ));
    }
    if min_length > max_length {
        return Err(EngineError::invalid_query(format!(
            "min_length ({min_length}) must not exceed max_length ({max_length})"
        )));
    }
    Ok(())
}
