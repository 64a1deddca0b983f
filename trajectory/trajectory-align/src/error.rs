//! Error types for ground alignment.

use thiserror::Error;

/// Result type for ground alignment operations.
pub type AlignResult<T> = Result<T, AlignError>;

/// Errors that can occur during ground alignment.
///
/// Poor fits are not errors: a noisy or degenerate trajectory always yields
/// some normal. Only unusable input and configuration are rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    /// Not enough points for the operation.
    #[error("insufficient points: need at least {required}, got {actual}")]
    InsufficientPoints {
        /// Minimum number of points required.
        required: usize,
        /// Actual number of points provided.
        actual: usize,
    },

    /// Parameters are out of their valid range.
    #[error("invalid ground parameters: {0}")]
    InvalidParams(String),
}

impl AlignError {
    /// Creates an invalid parameters error.
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_points_message() {
        let err = AlignError::InsufficientPoints {
            required: 1,
            actual: 0,
        };
        assert!(err.to_string().contains("need at least 1"));
    }

    #[test]
    fn invalid_params_message() {
        let err = AlignError::invalid_params("window_size must be > 0");
        assert!(err.to_string().contains("window_size"));
    }
}
