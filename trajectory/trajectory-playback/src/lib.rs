//! Trajectory playback over a ground-levelled scene.
//!
//! A [`Viewer`] owns everything a render loop needs:
//!
//! - the loaded trajectory and point cloud (either may be missing),
//! - one [`SceneGroup`] that applies the fitted ground alignment to every layer,
//! - a [`PlaybackController`] stepping through frames.
//!
//! The render loop calls [`Viewer::on_frame`] once per displayed frame; input
//! handlers call [`Viewer::toggle`], [`Viewer::seek`] and [`Viewer::reset`].
//!
//! # Example
//!
//! ```no_run
//! use trajectory_playback::{ScenePaths, Viewer, ViewerParams};
//!
//! let paths = ScenePaths {
//!     trajectory: Some("trajectory.json".into()),
//!     cloud: Some("points3D.ply".into()),
//! };
//! let mut viewer = Viewer::load(&paths, &ViewerParams::default()).unwrap();
//!
//! viewer.toggle();
//! while let Some(update) = viewer.on_frame() {
//!     println!("frame {} at {:.2}s: {:?}", update.frame, update.timestamp, update.marker.position);
//!     # break;
//! }
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod params;
mod playback;
mod scene;
mod viewer;

pub use error::{ViewerError, ViewerResult};
pub use params::ViewerParams;
pub use playback::{PlaybackController, PlaybackState, ReplayRate};
pub use scene::{Marker, MarkerKind, SceneGroup};
pub use viewer::{FrameUpdate, ScenePaths, Viewer};
