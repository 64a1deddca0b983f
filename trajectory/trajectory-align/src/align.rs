//! Ground alignment entry points.

use nalgebra::Point3;
use tracing::{debug, info};
use trajectory_types::Trajectory;

use crate::error::{AlignError, AlignResult};
use crate::fit::{centroid, fit_normal};
use crate::ground::{merge_ground_points, select_ground_windows};
use crate::params::GroundParams;
use crate::plane::Plane;
use crate::result::{GroundFit, GroundReport};
use crate::transform::GroundAlignment;
use crate::window::depth_windows;

/// Find the dominant walking surface of a camera path and level it.
///
/// `positions` are the camera centres in capture order. The returned
/// alignment rotates the fitted ground normal onto +Y and offsets the scene
/// so the lowest rotated position has Y = 0.
///
/// Degenerate input (a single point, all-identical positions, a perfectly
/// straight walk) still produces an alignment; it just carries no tilt.
///
/// # Errors
///
/// Returns [`AlignError::InvalidParams`] if `params` fail validation, or
/// [`AlignError::InsufficientPoints`] if `positions` is empty.
pub fn align_ground(positions: &[Point3<f64>], params: &GroundParams) -> AlignResult<GroundFit> {
    params.validate()?;
    if positions.is_empty() {
        return Err(AlignError::InsufficientPoints {
            required: 1,
            actual: 0,
        });
    }

    let windows = depth_windows(positions, params.window_size, params.window_stride);
    let selection = select_ground_windows(&windows, params);
    let ground = merge_ground_points(positions, &windows, &selection, params.dedup_decimals);

    debug!(
        windows = windows.len(),
        ground_windows = selection.windows.len(),
        ground_points = ground.len(),
        fallback = selection.fallback,
        "Selected ground windows"
    );

    let center = centroid(&ground);
    let normal = fit_normal(&ground, &center, params.fit);
    let alignment = GroundAlignment::from_normal(normal, positions);

    #[allow(clippy::cast_precision_loss)]
    let residual = if ground.is_empty() {
        0.0
    } else {
        Plane::from_unit(center, normal).squared_error(&ground) / ground.len() as f64
    };

    let report = GroundReport {
        window_count: windows.len(),
        ground_window_count: selection.windows.len(),
        used_fallback: selection.fallback,
        ground_points: ground.len(),
        centroid: center,
        residual,
    };

    info!(
        normal_x = normal.x,
        normal_y = normal.y,
        normal_z = normal.z,
        tilt_deg = alignment.tilt_degrees(),
        vertical_offset = alignment.vertical_offset(),
        "Ground plane aligned"
    );

    Ok(GroundFit { alignment, report })
}

/// [`align_ground`] over the positions of a trajectory.
///
/// # Errors
///
/// Same as [`align_ground`]; an empty trajectory yields
/// [`AlignError::InsufficientPoints`].
pub fn align_trajectory(trajectory: &Trajectory, params: &GroundParams) -> AlignResult<GroundFit> {
    let positions: Vec<Point3<f64>> = trajectory.positions().collect();
    align_ground(&positions, params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::params::PlaneFitMethod;
    use approx::assert_relative_eq;
    use nalgebra::{UnitQuaternion, Vector3};
    use trajectory_types::Pose;

    fn lowest_y(fit: &GroundFit, positions: &[Point3<f64>]) -> f64 {
        positions
            .iter()
            .map(|p| fit.alignment.apply_point(p).y)
            .fold(f64::INFINITY, f64::min)
    }

    fn highest_y(fit: &GroundFit, positions: &[Point3<f64>]) -> f64 {
        positions
            .iter()
            .map(|p| fit.alignment.apply_point(p).y)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    #[test]
    fn straight_level_walk() {
        // 100 poses along the forward axis at constant height 1.0.
        let positions: Vec<_> = (0..100)
            .map(|i| Point3::new(0.0, 1.0, f64::from(i) * 0.05))
            .collect();

        let fit = align_ground(&positions, &GroundParams::default()).unwrap();

        assert_eq!(fit.report.window_count, 71);
        assert_eq!(fit.report.ground_window_count, 71);
        assert!(!fit.report.used_fallback);
        assert_relative_eq!(
            fit.alignment.normal().into_inner(),
            Vector3::y(),
            epsilon = 1e-9
        );
        assert_relative_eq!(lowest_y(&fit, &positions), 0.0, epsilon = 1e-9);

        // Vertical extent is preserved by a rigid levelling.
        let before = positions.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
            - positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let after = highest_y(&fit, &positions) - lowest_y(&fit, &positions);
        assert_relative_eq!(after, before, epsilon = 1e-9);
    }

    #[test]
    fn refit_of_levelled_ground_is_vertical() {
        let tilt = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.2);
        let positions: Vec<_> = (0..120)
            .map(|i| {
                let t = f64::from(i) * 0.05;
                tilt * Point3::new(t.sin() * 2.0, 0.5, t)
            })
            .collect();
        let params = GroundParams::default().fit(PlaneFitMethod::Eigen);

        let first = align_ground(&positions, &params).unwrap();
        let levelled: Vec<_> = positions
            .iter()
            .map(|p| first.alignment.apply_point(p))
            .collect();

        let second = align_ground(&levelled, &params).unwrap();
        assert_relative_eq!(second.alignment.normal().y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(second.alignment.vertical_offset(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn stairs_do_not_dominate_the_fit() {
        // Level corridor, then a staircase climbing 3 units over 1 unit of depth.
        let mut positions = Vec::new();
        for i in 0..150 {
            let z = f64::from(i) * 0.05;
            positions.push(Point3::new((z * 1.7).sin(), 0.0, z));
        }
        for i in 0..40 {
            let s = f64::from(i) / 40.0;
            positions.push(Point3::new(0.0, 3.0 * s, 7.5 + s));
        }

        let fit = align_ground(&positions, &GroundParams::default()).unwrap();
        assert!(!fit.report.used_fallback);
        assert!(fit.report.ground_window_count < fit.report.window_count);
        assert!(fit.alignment.tilt_degrees() < 1e-6);
        assert_relative_eq!(lowest_y(&fit, &positions), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn identical_positions_degenerate_but_valid() {
        let positions = vec![Point3::new(1.0, 2.0, 3.0); 45];
        let fit = align_ground(&positions, &GroundParams::default()).unwrap();
        assert_eq!(fit.report.ground_points, 1);
        assert!(fit.alignment.normal().y >= 0.0);
        assert_relative_eq!(lowest_y(&fit, &positions), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn short_trajectory_uses_single_window() {
        let positions: Vec<_> = (0..12)
            .map(|i| Point3::new(f64::from(i % 4), -2.0, f64::from(i / 4)))
            .collect();
        let fit = align_ground(&positions, &GroundParams::default()).unwrap();
        assert_eq!(fit.report.window_count, 1);
        assert_eq!(fit.report.ground_window_count, 1);
        assert_relative_eq!(fit.alignment.vertical_offset(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            align_ground(&[], &GroundParams::default()),
            Err(AlignError::InsufficientPoints {
                required: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn invalid_params_are_rejected() {
        let positions = [Point3::origin()];
        let params = GroundParams::default().window_size(0);
        assert!(matches!(
            align_ground(&positions, &params),
            Err(AlignError::InvalidParams(_))
        ));
    }

    #[test]
    fn trajectory_wrapper() {
        let poses = (0..40)
            .map(|i| Pose::from_coords(0.0, 4.0, f64::from(i)))
            .collect();
        let trajectory = Trajectory::new(poses, 12.0).unwrap();
        let fit = align_trajectory(&trajectory, &GroundParams::default()).unwrap();
        assert_relative_eq!(fit.alignment.vertical_offset(), -4.0, epsilon = 1e-9);
    }
}
