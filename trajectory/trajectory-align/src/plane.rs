//! Plane representation for ground fitting.

use nalgebra::{Point3, Unit, Vector3};

/// A plane in 3D space defined by a point and a unit normal.
///
/// The plane equation is: `normal · (p - point) = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub point: Point3<f64>,
    /// The plane normal.
    pub normal: Unit<Vector3<f64>>,
}

impl Plane {
    /// Create a new plane from a point and normal.
    ///
    /// The normal is automatically normalized.
    ///
    /// # Returns
    ///
    /// `Some(Plane)` if the normal is non-zero, `None` otherwise.
    #[must_use]
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Option<Self> {
        let normal = Unit::try_new(normal, f64::EPSILON)?;
        Some(Self { point, normal })
    }

    /// Create a plane from a point and an already-normalized normal.
    #[must_use]
    pub const fn from_unit(point: Point3<f64>, normal: Unit<Vector3<f64>>) -> Self {
        Self { point, normal }
    }

    /// Compute the signed distance from a point to the plane.
    ///
    /// Positive distance means the point is on the side the normal points to.
    #[must_use]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.point))
    }

    /// Sum of squared signed distances of `points` to the plane.
    #[must_use]
    pub fn squared_error(&self, points: &[Point3<f64>]) -> f64 {
        points
            .iter()
            .map(|p| {
                let d = self.signed_distance(p);
                d * d
            })
            .sum()
    }

    /// Angle between the plane normal and `axis`, in radians, ignoring sign.
    ///
    /// Zero means the plane is perpendicular to `axis`.
    #[must_use]
    pub fn tilt_from(&self, axis: &Vector3<f64>) -> f64 {
        let Some(axis) = Unit::try_new(*axis, f64::EPSILON) else {
            return 0.0;
        };
        self.normal.dot(&axis).abs().clamp(0.0, 1.0).acos()
    }
}

/// Create a default plane (Y=0) for testing fallback scenarios.
#[cfg(test)]
fn default_plane() -> Plane {
    Plane::from_unit(Point3::origin(), Vector3::y_axis())
}
