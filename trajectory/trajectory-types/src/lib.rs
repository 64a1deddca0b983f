//! Core types for camera-trajectory playback.
//!
//! This crate defines the data the rest of the workspace passes around:
//!
//! - [`Pose`] - One camera pose per processed video frame
//! - [`Trajectory`] - Ordered, randomly indexable sequence of poses plus frame rate
//! - [`PointCloud`] - Reconstructed scene points with optional colour
//!
//! # Coordinate Convention
//!
//! Positions are expressed in the viewer frame: X right, Y up, Z forward.
//! Y is the vertical axis and Z is the forward-progression (depth) axis.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use trajectory_types::{Pose, Trajectory};
//!
//! let poses = (0..10)
//!     .map(|i| Pose::from_position(Point3::new(0.0, 1.0, f64::from(i))))
//!     .collect();
//! let trajectory = Trajectory::new(poses, 10.0).unwrap();
//!
//! assert_eq!(trajectory.len(), 10);
//! assert!((trajectory.duration() - 1.0).abs() < 1e-12);
//! assert!(trajectory.at(10).is_err());
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod cloud;
mod error;
mod pose;
mod trajectory;

pub use cloud::PointCloud;
pub use error::{TrajectoryError, TrajectoryResult};
pub use pose::Pose;
pub use trajectory::Trajectory;

/// Index of the vertical axis in the viewer frame.
pub const VERTICAL_AXIS: usize = 1;

/// Index of the forward-progression (depth) axis in the viewer frame.
pub const DEPTH_AXIS: usize = 2;
