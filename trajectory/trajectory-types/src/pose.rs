//! Per-frame camera pose.

use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Camera pose for a single processed video frame.
///
/// Only the position is required. Orientation, viewing direction and the
/// source image name are carried through when the producer supplies them.
/// The frame index is implicit: it is the pose's position in its
/// [`Trajectory`](crate::Trajectory).
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    /// Camera centre in the viewer frame.
    pub position: Point3<f64>,
    /// Camera orientation, if known.
    pub rotation: Option<UnitQuaternion<f64>>,
    /// Viewing direction in the viewer frame, if known.
    pub forward: Option<Vector3<f64>>,
    /// Name of the image this pose was recovered from.
    pub image_name: Option<String>,
}

impl Pose {
    /// Creates a pose with only a position.
    #[must_use]
    pub const fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: None,
            forward: None,
            image_name: None,
        }
    }

    /// Creates a pose from raw coordinates.
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::from_position(Point3::new(x, y, z))
    }

    /// Sets the orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: UnitQuaternion<f64>) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Sets the viewing direction.
    #[must_use]
    pub fn with_forward(mut self, forward: Vector3<f64>) -> Self {
        self.forward = Some(forward);
        self
    }

    /// Sets the source image name.
    #[must_use]
    pub fn with_image_name(mut self, name: impl Into<String>) -> Self {
        self.image_name = Some(name.into());
        self
    }

    /// Returns true if every coordinate of the position is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_optional_fields() {
        let pose = Pose::from_coords(1.0, 2.0, 3.0)
            .with_rotation(UnitQuaternion::identity())
            .with_forward(Vector3::z())
            .with_image_name("frame_000001.jpg");

        assert_eq!(pose.position, Point3::new(1.0, 2.0, 3.0));
        assert!(pose.rotation.is_some());
        assert_eq!(pose.forward, Some(Vector3::z()));
        assert_eq!(pose.image_name.as_deref(), Some("frame_000001.jpg"));
    }

    #[test]
    fn non_finite_position_detected() {
        assert!(Pose::from_coords(0.0, 0.0, 0.0).is_finite());
        assert!(!Pose::from_coords(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Pose::from_coords(0.0, f64::INFINITY, 0.0).is_finite());
    }
}
