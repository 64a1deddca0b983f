//! Least-squares plane normal estimation.
//!
//! Both strategies minimise the sum of squared distances from the ground
//! points to a plane through their centroid. The angular grid is exact on its
//! sample lattice and trivially robust; the eigen fit is continuous.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Point3, SymmetricEigen, Unit, Vector3};

use crate::params::PlaneFitMethod;
use crate::plane::Plane;

/// Estimate the ground normal of `points` about `centroid`.
///
/// The result always points up (non-negative Y). With fewer than three
/// points, or perfectly collinear ones, many normals fit equally well; the
/// grid search then returns +Y because it is the first candidate visited.
#[must_use]
pub fn fit_normal(
    points: &[Point3<f64>],
    centroid: &Point3<f64>,
    method: PlaneFitMethod,
) -> Unit<Vector3<f64>> {
    let normal = match method {
        PlaneFitMethod::AngularGrid { steps } => grid_search(points, centroid, steps.max(1)),
        PlaneFitMethod::Eigen => eigen_normal(points, centroid),
    };
    if normal.y < 0.0 {
        Unit::new_unchecked(-normal.into_inner())
    } else {
        normal
    }
}

/// Unit normal with polar angle `theta` from +Y and azimuth `phi` in XZ.
fn spherical(theta: f64, phi: f64) -> Unit<Vector3<f64>> {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Unit::new_unchecked(Vector3::new(sin_t * cos_p, cos_t, sin_t * sin_p))
}

fn grid_search(points: &[Point3<f64>], centroid: &Point3<f64>, steps: u32) -> Unit<Vector3<f64>> {
    let step = PI / f64::from(steps);
    let mut best = Vector3::y_axis();
    let mut best_error = f64::INFINITY;

    for i in 0..=steps {
        let theta = f64::from(i) * step;
        for j in 0..2 * steps {
            let normal = spherical(theta, f64::from(j) * step);
            let error = Plane::from_unit(*centroid, normal).squared_error(points);
            if error < best_error {
                best_error = error;
                best = normal;
            }
        }
    }

    best
}

#[allow(clippy::cast_precision_loss)]
fn eigen_normal(points: &[Point3<f64>], centroid: &Point3<f64>) -> Unit<Vector3<f64>> {
    if points.len() < 3 {
        return Vector3::y_axis();
    }

    let mut covariance = Matrix3::zeros();
    for p in points {
        let d = p - centroid;
        covariance += d * d.transpose();
    }
    covariance /= points.len() as f64;

    let eigen = SymmetricEigen::new(covariance);
    let smallest = eigen.eigenvalues.imin();
    let normal = eigen.eigenvectors.column(smallest).into_owned();

    Unit::try_new(normal, f64::EPSILON).unwrap_or_else(Vector3::y_axis)
}

/// Centroid of a point set; the origin when empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub(crate) fn centroid(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}
