//! Error types for trajectory construction and lookup.

use thiserror::Error;

/// Result type for trajectory operations.
pub type TrajectoryResult<T> = Result<T, TrajectoryError>;

/// Errors that can occur when building or indexing a trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrajectoryError {
    /// Frame index outside `[0, len - 1]`.
    #[error("frame index {index} out of range for trajectory of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of frames in the trajectory.
        len: usize,
    },

    /// Frame rate is not a finite positive number.
    #[error("invalid frame rate: {fps} (must be finite and > 0)")]
    InvalidFrameRate {
        /// The rejected frame rate.
        fps: f64,
    },

    /// A pose carries a non-finite coordinate.
    #[error("pose {index} has a non-finite position")]
    NonFinitePosition {
        /// Index of the offending pose.
        index: usize,
    },
}

impl TrajectoryError {
    /// Creates an index out of range error.
    #[must_use]
    pub const fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_message() {
        let err = TrajectoryError::index_out_of_range(12, 10);
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn invalid_frame_rate_message() {
        let err = TrajectoryError::InvalidFrameRate { fps: -1.0 };
        assert!(err.to_string().contains("invalid frame rate"));
    }
}
