//! Ground-plane alignment for walking camera trajectories.
//!
//! Camera paths recovered by Structure-from-Motion live in an arbitrary frame:
//! the floor the camera operator walked on is generally tilted. This crate
//! finds the dominant walking surface in the trajectory itself and produces a
//! [`GroundAlignment`] that levels it.
//!
//! # Pipeline
//!
//! 1. Order positions by depth (Z) and slide a fixed-size window over them
//! 2. Measure the vertical (Y) variance of each window
//! 3. Keep the flat windows, with a rank-based fallback when too few are flat
//! 4. Merge and de-duplicate their points
//! 5. Fit a plane through the centroid (angular grid search or eigen fit)
//! 6. Rotate the plane normal onto +Y and drop the lowest position to Y = 0
//!
//! Stairs and ramps produce high-variance windows and are excluded from the fit.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point3;
//! use trajectory_align::{GroundParams, align_ground};
//!
//! // A flat walk one unit above the origin
//! let positions: Vec<_> = (0..100)
//!     .map(|i| Point3::new((f64::from(i) * 0.3).sin(), 1.0, f64::from(i) * 0.1))
//!     .collect();
//!
//! let fit = align_ground(&positions, &GroundParams::default()).unwrap();
//! assert!(fit.alignment.normal().y > 0.999);
//!
//! let lowest = positions
//!     .iter()
//!     .map(|p| fit.alignment.apply_point(p).y)
//!     .fold(f64::INFINITY, f64::min);
//! assert!(lowest.abs() < 1e-9);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod align;
mod error;
mod fit;
mod ground;
mod params;
mod plane;
mod result;
mod transform;
mod window;

pub use align::{align_ground, align_trajectory};
pub use error::{AlignError, AlignResult};
pub use fit::fit_normal;
pub use ground::{GroundSelection, merge_ground_points, select_ground_windows};
pub use params::{GroundParams, PlaneFitMethod};
pub use plane::Plane;
pub use result::{GroundFit, GroundReport};
pub use transform::{GroundAlignment, shortest_arc};
pub use window::{DepthWindow, depth_windows};
