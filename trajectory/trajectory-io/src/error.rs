//! Error types for trajectory and point-cloud I/O.

use std::path::PathBuf;
use thiserror::Error;
use trajectory_types::TrajectoryError;

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while reading or writing trajectory data.
#[derive(Debug, Error)]
pub enum IoError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid file content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// Unexpected end of file.
    #[error("unexpected end of file at position {position}")]
    UnexpectedEof {
        /// Byte offset where EOF was encountered.
        position: u64,
    },

    /// A COLMAP camera uses a model id this reader does not know.
    #[error("unknown COLMAP camera model id {model_id}")]
    UnknownCameraModel {
        /// The unrecognised model id.
        model_id: i32,
    },

    /// No sparse model was found under a workspace.
    #[error("no COLMAP model with images.bin under {path}")]
    NoModels {
        /// Directory that was searched.
        path: PathBuf,
    },

    /// The decoded data does not form a valid trajectory.
    #[error("invalid trajectory: {0}")]
    Trajectory(#[from] TrajectoryError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }

    /// Map an open failure to `FileNotFound` when appropriate.
    pub(crate) fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
