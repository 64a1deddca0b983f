//! The levelled scene: every rendered layer under one group transform.

use nalgebra::{Matrix4, Point3, Vector3};
use trajectory_align::GroundAlignment;
use trajectory_types::{PointCloud, Pose, Trajectory};

/// What a marker stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// First pose of the trajectory.
    Start,
    /// Last pose of the trajectory.
    End,
    /// The camera at the current playback frame.
    Camera,
}

/// A point of interest in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Marker role.
    pub kind: MarkerKind,
    /// World-space position.
    pub position: Point3<f64>,
    /// World-space viewing direction, if the pose has one.
    pub forward: Option<Vector3<f64>>,
}

/// Scene layers sharing one ground alignment.
///
/// Layers are kept in their source frame and transformed on the way out, so
/// the trajectory, cloud and markers can never disagree about where the
/// ground is.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGroup {
    transform: GroundAlignment,
    path: Vec<Point3<f64>>,
    cloud: Option<PointCloud>,
}

impl SceneGroup {
    /// Group the layers under `transform`.
    ///
    /// World-space positions are computed once here; the transform does not
    /// change afterwards.
    #[must_use]
    pub fn new(
        transform: GroundAlignment,
        trajectory: Option<&Trajectory>,
        cloud: Option<&PointCloud>,
    ) -> Self {
        let path = trajectory
            .map(|t| t.positions().map(|p| transform.apply_point(&p)).collect())
            .unwrap_or_default();
        let cloud = cloud.map(|c| c.map_points(|p| transform.apply_point(p)));
        Self {
            transform,
            path,
            cloud,
        }
    }

    /// The group transform.
    #[must_use]
    pub const fn transform(&self) -> &GroundAlignment {
        &self.transform
    }

    /// The group transform as a homogeneous matrix.
    #[must_use]
    pub fn matrix(&self) -> Matrix4<f64> {
        self.transform.to_homogeneous()
    }

    /// Trajectory positions in world space.
    #[must_use]
    pub fn path(&self) -> &[Point3<f64>] {
        &self.path
    }

    /// Point cloud in world space, if one was loaded.
    #[must_use]
    pub const fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    /// World-space marker for `pose`.
    #[must_use]
    pub fn marker(&self, kind: MarkerKind, pose: &Pose) -> Marker {
        Marker {
            kind,
            position: self.transform.apply_point(&pose.position),
            forward: pose.forward.map(|f| self.transform.apply_vector(&f)),
        }
    }

    /// Start and end markers of `trajectory`; empty for an empty trajectory.
    #[must_use]
    pub fn endpoint_markers(&self, trajectory: &Trajectory) -> Vec<Marker> {
        let poses = trajectory.poses();
        match (poses.first(), poses.last()) {
            (Some(first), Some(last)) => vec![
                self.marker(MarkerKind::Start, first),
                self.marker(MarkerKind::End, last),
            ],
            _ => Vec::new(),
        }
    }
}
