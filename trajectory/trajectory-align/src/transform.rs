//! Levelling transform shared by every rendered element.

use std::f64::consts::PI;

use nalgebra::{Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3};

/// Create a rotation that takes one direction onto another along the shortest arc.
///
/// Zero-length inputs yield the identity. Anti-parallel inputs are rotated by
/// π about an axis perpendicular to `from`.
#[must_use]
pub fn shortest_arc(from: &Vector3<f64>, to: &Vector3<f64>) -> UnitQuaternion<f64> {
    let (Some(from), Some(to)) = (
        Unit::try_new(*from, f64::EPSILON),
        Unit::try_new(*to, f64::EPSILON),
    ) else {
        return UnitQuaternion::identity();
    };

    let dot = from.dot(&to);

    // Vectors are nearly parallel
    if dot > 1.0 - f64::EPSILON {
        return UnitQuaternion::identity();
    }

    // Vectors are nearly anti-parallel
    if dot < -1.0 + f64::EPSILON {
        let helper = if from.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let axis = Unit::new_normalize(helper.cross(&from));
        return UnitQuaternion::from_axis_angle(&axis, PI);
    }

    let axis = Unit::new_normalize(from.cross(&to));
    UnitQuaternion::from_axis_angle(&axis, dot.acos())
}

/// Rigid transform that levels a scene onto its walking surface.
///
/// Points are first rotated so the fitted ground normal becomes +Y, then
/// lifted by `vertical_offset` so the lowest trajectory position sits at Y = 0.
/// Every layer of a scene (trajectory, point cloud, markers) must go through
/// the same instance so they stay mutually consistent.
///
/// # Example
///
/// ```
/// use nalgebra::{Point3, Vector3};
/// use trajectory_align::GroundAlignment;
///
/// let positions = [Point3::new(0.0, 2.0, 0.0), Point3::new(0.0, 3.0, 1.0)];
/// let alignment = GroundAlignment::from_normal(Vector3::y_axis(), &positions);
///
/// assert!((alignment.vertical_offset() + 2.0).abs() < 1e-12);
/// assert!(alignment.apply_point(&positions[0]).y.abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundAlignment {
    normal: Unit<Vector3<f64>>,
    rotation: UnitQuaternion<f64>,
    vertical_offset: f64,
}

impl Default for GroundAlignment {
    fn default() -> Self {
        Self::identity()
    }
}

impl GroundAlignment {
    /// The transform that leaves everything in place.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            normal: Vector3::y_axis(),
            rotation: UnitQuaternion::identity(),
            vertical_offset: 0.0,
        }
    }

    /// Build the alignment for a fitted ground normal.
    ///
    /// The offset is computed from the rotated `positions` so that their
    /// minimum vertical coordinate becomes zero. With no positions the offset
    /// is zero.
    #[must_use]
    pub fn from_normal(normal: Unit<Vector3<f64>>, positions: &[Point3<f64>]) -> Self {
        let rotation = shortest_arc(&normal, &Vector3::y());
        let lowest = positions
            .iter()
            .map(|p| (rotation * p).y)
            .fold(f64::INFINITY, f64::min);
        let vertical_offset = if lowest.is_finite() { -lowest } else { 0.0 };

        Self {
            normal,
            rotation,
            vertical_offset,
        }
    }

    /// Ground normal in the source frame.
    #[must_use]
    pub const fn normal(&self) -> &Unit<Vector3<f64>> {
        &self.normal
    }

    /// Rotation taking the ground normal onto +Y.
    #[must_use]
    pub const fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }

    /// Vertical translation applied after rotation.
    #[must_use]
    pub const fn vertical_offset(&self) -> f64 {
        self.vertical_offset
    }

    /// Tilt of the source ground from horizontal, in degrees.
    #[must_use]
    pub fn tilt_degrees(&self) -> f64 {
        self.normal.y.clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Transform a point from the source frame into the levelled frame.
    #[must_use]
    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let mut p = self.rotation * point;
        p.y += self.vertical_offset;
        p
    }

    /// Transform a direction (rotation only).
    #[must_use]
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Map a levelled point back into the source frame.
    #[must_use]
    pub fn invert_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let mut p = *point;
        p.y -= self.vertical_offset;
        self.rotation.inverse_transform_point(&p)
    }

    /// Homogeneous 4x4 matrix for renderers that take a group matrix.
    #[must_use]
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        let lift = Translation3::new(0.0, self.vertical_offset, 0.0);
        lift.to_homogeneous() * self.rotation.to_homogeneous()
    }
}
