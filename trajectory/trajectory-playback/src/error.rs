//! Error types for the viewer.

use thiserror::Error;
use trajectory_align::AlignError;

/// Result type for viewer construction.
pub type ViewerResult<T> = Result<T, ViewerError>;

/// Errors that can occur while building a viewer.
///
/// Missing or malformed input files are not errors: the affected layer is
/// left out and a warning is logged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// Viewer parameters are out of their valid range.
    #[error("invalid viewer parameters: {0}")]
    InvalidParams(String),

    /// Ground alignment was rejected.
    #[error("ground alignment failed: {0}")]
    Align(#[from] AlignError),
}

impl ViewerError {
    /// Creates an invalid parameters error.
    #[must_use]
    pub fn invalid_params(reason: impl Into<String>) -> Self {
        Self::InvalidParams(reason.into())
    }
}
