//! The viewer context: loaded layers, ground alignment and playback.

use std::path::PathBuf;

use tracing::{info, warn};
use trajectory_align::{align_trajectory, AlignError, GroundAlignment, GroundReport};
use trajectory_io::{load_point_cloud, load_trajectory};
use trajectory_types::{PointCloud, Trajectory};

use crate::error::ViewerResult;
use crate::params::ViewerParams;
use crate::playback::{PlaybackController, PlaybackState, ReplayRate};
use crate::scene::{Marker, MarkerKind, SceneGroup};

/// Input files for a viewer. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenePaths {
    /// Trajectory JSON document.
    pub trajectory: Option<PathBuf>,
    /// PLY point cloud.
    pub cloud: Option<PathBuf>,
}

/// What the renderer needs for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUpdate {
    /// Trajectory frame index.
    pub frame: usize,
    /// Seconds since the first frame, `frame / fps`.
    pub timestamp: f64,
    /// World-space camera marker.
    pub marker: Marker,
}

/// Single owned viewer state.
///
/// Everything the render loop and input handlers touch lives here and is
/// passed around as `&mut Viewer`. Layers are independent: a missing cloud
/// does not prevent trajectory playback, and a missing trajectory still
/// shows the cloud (unlevelled).
///
/// # Example
///
/// ```
/// use trajectory_playback::{Viewer, ViewerParams};
/// use trajectory_types::{Pose, Trajectory};
///
/// let poses = (0..10).map(|i| Pose::from_coords(0.0, 1.0, f64::from(i))).collect();
/// let trajectory = Trajectory::new(poses, 12.0).unwrap();
///
/// let mut viewer = Viewer::from_parts(Some(trajectory), None, &ViewerParams::default()).unwrap();
/// viewer.toggle();
/// let update = viewer.on_frame().unwrap();
/// assert_eq!(update.frame, 1);
/// assert!(update.marker.position.y.abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Viewer {
    trajectory: Option<Trajectory>,
    scene: SceneGroup,
    playback: PlaybackController,
    ground: Option<GroundReport>,
    replay: Option<ReplayRate>,
}

impl Viewer {
    /// Load the layers named in `paths` and build the viewer.
    ///
    /// A layer that fails to load is logged with `warn!` and left out.
    ///
    /// # Errors
    ///
    /// Returns an error only if `params` are invalid.
    pub fn load(paths: &ScenePaths, params: &ViewerParams) -> ViewerResult<Self> {
        params.validate()?;

        let trajectory = paths.trajectory.as_ref().and_then(|path| {
            load_trajectory(path)
                .inspect_err(|e| {
                    warn!(path = %path.display(), error = %e, "Trajectory unavailable");
                })
                .ok()
        });
        let cloud = paths.cloud.as_ref().and_then(|path| {
            load_point_cloud(path)
                .inspect_err(|e| {
                    warn!(path = %path.display(), error = %e, "Point cloud unavailable");
                })
                .ok()
        });

        Self::from_parts(trajectory, cloud, params)
    }

    /// Build the viewer from already loaded layers.
    ///
    /// The ground is fitted once, from the trajectory, and the resulting
    /// transform is shared by all layers. Without a (non-empty) trajectory,
    /// or with levelling disabled, the identity transform is used.
    ///
    /// # Errors
    ///
    /// Returns an error only if `params` are invalid.
    pub fn from_parts(
        trajectory: Option<Trajectory>,
        cloud: Option<PointCloud>,
        params: &ViewerParams,
    ) -> ViewerResult<Self> {
        params.validate()?;

        let (alignment, ground) = match trajectory.as_ref() {
            Some(t) if params.align_ground => match align_trajectory(t, &params.ground) {
                Ok(fit) => (fit.alignment, Some(fit.report)),
                Err(AlignError::InsufficientPoints { .. }) => (GroundAlignment::identity(), None),
                Err(e) => return Err(e.into()),
            },
            _ => (GroundAlignment::identity(), None),
        };

        let replay = trajectory.as_ref().map(|t| {
            let rate = ReplayRate::new(params.display_rate_hz, t.fps());
            if rate.diverges(params.rate_tolerance) {
                warn!(
                    display_rate_hz = rate.display_rate_hz,
                    capture_fps = rate.capture_fps,
                    speedup = rate.speedup(),
                    "Replay rate differs from capture rate"
                );
            }
            rate
        });

        let frame_count = trajectory.as_ref().map_or(0, Trajectory::len);
        let scene = SceneGroup::new(alignment, trajectory.as_ref(), cloud.as_ref());

        info!(
            frames = frame_count,
            cloud_points = scene.cloud().map_or(0, PointCloud::len),
            tilt_deg = alignment.tilt_degrees(),
            "Viewer ready"
        );

        Ok(Self {
            trajectory,
            scene,
            playback: PlaybackController::new(frame_count),
            ground,
            replay,
        })
    }

    /// Render callback: advance playback (if playing) and describe the frame.
    ///
    /// Returns `None` when there is no trajectory to play.
    pub fn on_frame(&mut self) -> Option<FrameUpdate> {
        self.playback.tick();
        self.current()
    }

    /// Describe the current frame without advancing.
    #[must_use]
    pub fn current(&self) -> Option<FrameUpdate> {
        let trajectory = self.trajectory.as_ref()?;
        let frame = self.playback.current_frame();
        let pose = trajectory.at(frame).ok()?;
        let timestamp = trajectory.timestamp(frame).ok()?;
        Some(FrameUpdate {
            frame,
            timestamp,
            marker: self.scene.marker(MarkerKind::Camera, pose),
        })
    }

    /// Jump to `frame`, clamped into range. Returns the selected frame.
    pub fn seek(&mut self, frame: i64) -> usize {
        self.playback.seek(frame)
    }

    /// Switch between playing and paused.
    pub fn toggle(&mut self) -> PlaybackState {
        self.playback.toggle()
    }

    /// Back to frame 0, paused.
    pub fn reset(&mut self) {
        self.playback.reset();
    }

    /// Playback state.
    #[must_use]
    pub const fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    /// The levelled scene.
    #[must_use]
    pub const fn scene(&self) -> &SceneGroup {
        &self.scene
    }

    /// The loaded trajectory in its source frame.
    #[must_use]
    pub const fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Start and end markers in world space.
    #[must_use]
    pub fn endpoint_markers(&self) -> Vec<Marker> {
        self.trajectory
            .as_ref()
            .map(|t| self.scene.endpoint_markers(t))
            .unwrap_or_default()
    }

    /// Ground-fit diagnostics, if a fit was made.
    #[must_use]
    pub const fn ground_report(&self) -> Option<&GroundReport> {
        self.ground.as_ref()
    }

    /// Display-to-capture rate relation, if a trajectory is loaded.
    #[must_use]
    pub const fn replay_rate(&self) -> Option<&ReplayRate> {
        self.replay.as_ref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use trajectory_types::Pose;

    fn walk(n: u32, fps: f64) -> Trajectory {
        let poses = (0..n)
            .map(|i| Pose::from_coords(0.0, 1.0, f64::from(i) * 0.05))
            .collect();
        Trajectory::new(poses, fps).unwrap()
    }

    #[test]
    fn levelled_walk_sits_on_ground() {
        let viewer = Viewer::from_parts(Some(walk(100, 12.0)), None, &ViewerParams::default())
            .unwrap();
        let lowest = viewer
            .scene()
            .path()
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        assert_relative_eq!(lowest, 0.0, epsilon = 1e-9);
        assert_eq!(viewer.ground_report().unwrap().window_count, 71);
        assert!(viewer.replay_rate().unwrap().diverges(0.05));
    }

    #[test]
    fn alignment_can_be_disabled() {
        let params = ViewerParams::default().align_ground(false);
        let viewer = Viewer::from_parts(Some(walk(5, 12.0)), None, &params).unwrap();
        assert!(viewer.ground_report().is_none());
        assert_eq!(viewer.scene().path()[0], Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn playback_through_viewer() {
        let mut viewer =
            Viewer::from_parts(Some(walk(10, 10.0)), None, &ViewerParams::default()).unwrap();
        assert_eq!(viewer.on_frame().unwrap().frame, 0);

        viewer.toggle();
        for _ in 0..14 {
            viewer.on_frame();
        }
        let update = viewer.on_frame().unwrap();
        assert_eq!(update.frame, 5);
        assert_relative_eq!(update.timestamp, 0.5);
        assert_eq!(update.marker.kind, MarkerKind::Camera);

        assert_eq!(viewer.seek(-20), 0);
        assert_eq!(viewer.playback().state(), PlaybackState::Playing);
        viewer.reset();
        assert_eq!(viewer.playback().state(), PlaybackState::Paused);
    }

    #[test]
    fn empty_trajectory_disables_playback() {
        let empty = Trajectory::empty(12.0).unwrap();
        let mut viewer = Viewer::from_parts(Some(empty), None, &ViewerParams::default()).unwrap();
        assert!(!viewer.playback().is_enabled());
        assert_eq!(viewer.toggle(), PlaybackState::Paused);
        assert!(viewer.on_frame().is_none());
        assert!(viewer.endpoint_markers().is_empty());
        assert_eq!(*viewer.scene().transform(), GroundAlignment::identity());
    }

    #[test]
    fn cloud_only_viewer() {
        let cloud = PointCloud::from_points(vec![Point3::new(1.0, 2.0, 3.0)]);
        let viewer = Viewer::from_parts(None, Some(cloud), &ViewerParams::default()).unwrap();
        assert!(viewer.current().is_none());
        assert_eq!(viewer.scene().cloud().unwrap().points[0], Point3::new(1.0, 2.0, 3.0));
        assert!(viewer.replay_rate().is_none());
    }

    #[test]
    fn missing_files_are_omitted() {
        let paths = ScenePaths {
            trajectory: Some(PathBuf::from("no_such_trajectory_12345.json")),
            cloud: Some(PathBuf::from("no_such_cloud_12345.ply")),
        };
        let viewer = Viewer::load(&paths, &ViewerParams::default()).unwrap();
        assert!(viewer.trajectory().is_none());
        assert!(viewer.scene().cloud().is_none());
    }

    #[test]
    fn invalid_params_fail() {
        let params = ViewerParams::default().display_rate_hz(-1.0);
        assert!(Viewer::from_parts(None, None, &params).is_err());
    }
}
