//! File I/O for camera trajectories and reconstructed scenes.
//!
//! # Supported Formats
//!
//! | Data | Read | Write |
//! |------|------|-------|
//! | Trajectory JSON | [`load_trajectory`] | [`save_trajectory`] |
//! | PLY point cloud (ASCII/binary) | [`load_point_cloud`] | [`save_point_cloud`] |
//! | COLMAP `images.bin` / `cameras.bin` / `points3D.bin` | [`colmap`] | - |
//!
//! # Example
//!
//! ```no_run
//! use trajectory_io::colmap::{self, ExportParams};
//! use trajectory_io::{save_document, save_point_cloud};
//!
//! let model = colmap::largest_model("workspace/sparse").unwrap();
//! let images = colmap::read_images(model.images_path()).unwrap();
//! let document = colmap::export_trajectory(&images, &ExportParams::default()).unwrap();
//! save_document(&document, "trajectory.json").unwrap();
//!
//! let points = colmap::read_points3d(model.points_path()).unwrap();
//! save_point_cloud(&colmap::points_to_cloud(&points), "points3D.ply", true).unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

pub mod colmap;
mod document;
mod error;
mod ply;

pub use document::{
    load_document, load_trajectory, save_document, save_trajectory, FrameRecord,
    TrajectoryDocument, TrajectoryMetadata,
};
pub use error::{IoError, IoResult};
pub use ply::{load_point_cloud, save_point_cloud};
