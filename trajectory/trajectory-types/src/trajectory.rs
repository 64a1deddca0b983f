//! Ordered camera trajectory.

use nalgebra::Point3;

use crate::error::{TrajectoryError, TrajectoryResult};
use crate::pose::Pose;

/// An ordered, randomly indexable sequence of camera poses.
///
/// Poses are stored in capture order. Frame indices are dense, starting at
/// zero, and the timestamp of frame `i` is `i / fps`. A trajectory may be
/// empty; callers are expected to disable playback in that case rather than
/// treat it as a failure.
///
/// # Example
///
/// ```
/// use trajectory_types::{Pose, Trajectory};
///
/// let poses = vec![
///     Pose::from_coords(0.0, 0.0, 0.0),
///     Pose::from_coords(0.0, 0.0, 1.0),
///     Pose::from_coords(0.0, 0.0, 2.0),
/// ];
/// let trajectory = Trajectory::new(poses, 12.0).unwrap();
///
/// assert_eq!(trajectory.len(), 3);
/// assert!((trajectory.timestamp(2).unwrap() - 2.0 / 12.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    poses: Vec<Pose>,
    fps: f64,
}

impl Trajectory {
    /// Creates a trajectory from poses in capture order.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidFrameRate`] if `fps` is not finite and
    /// positive, or [`TrajectoryError::NonFinitePosition`] if any pose has a
    /// NaN or infinite coordinate.
    pub fn new(poses: Vec<Pose>, fps: f64) -> TrajectoryResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(TrajectoryError::InvalidFrameRate { fps });
        }
        if let Some(index) = poses.iter().position(|p| !p.is_finite()) {
            return Err(TrajectoryError::NonFinitePosition { index });
        }
        Ok(Self { poses, fps })
    }

    /// Creates an empty trajectory.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::InvalidFrameRate`] for a bad frame rate.
    pub fn empty(fps: f64) -> TrajectoryResult<Self> {
        Self::new(Vec::new(), fps)
    }

    /// Number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Returns true if the trajectory has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Capture frame rate.
    #[must_use]
    pub const fn fps(&self) -> f64 {
        self.fps
    }

    /// Total duration in seconds (`len / fps`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f64 {
        self.poses.len() as f64 / self.fps
    }

    /// Returns the pose at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::IndexOutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> TrajectoryResult<&Pose> {
        self.poses
            .get(index)
            .ok_or_else(|| TrajectoryError::index_out_of_range(index, self.poses.len()))
    }

    /// Timestamp of frame `index` in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TrajectoryError::IndexOutOfRange`] if `index >= len`.
    #[allow(clippy::cast_precision_loss)]
    pub fn timestamp(&self, index: usize) -> TrajectoryResult<f64> {
        self.at(index)?;
        Ok(index as f64 / self.fps)
    }

    /// Frame shown at time `t` seconds, clamped to the valid range.
    ///
    /// Returns `None` for an empty trajectory.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn frame_at_time(&self, t: f64) -> Option<usize> {
        let last = self.poses.len().checked_sub(1)?;
        if !t.is_finite() || t <= 0.0 {
            return Some(0);
        }
        let frame = (t * self.fps).floor();
        if frame >= last as f64 {
            Some(last)
        } else {
            Some(frame as usize)
        }
    }

    /// All poses in capture order.
    #[must_use]
    pub fn poses(&self) -> &[Pose] {
        &self.poses
    }

    /// Iterates over poses in capture order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pose> {
        self.poses.iter()
    }

    /// Iterates over camera positions in capture order.
    pub fn positions(&self) -> impl ExactSizeIterator<Item = Point3<f64>> + '_ {
        self.poses.iter().map(|p| p.position)
    }

    /// Total path length travelled by the camera.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        self.poses
            .windows(2)
            .map(|w| (w[1].position - w[0].position).norm())
            .sum()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Pose;
    type IntoIter = std::slice::Iter<'a, Pose>;

    fn into_iter(self) -> Self::IntoIter {
        self.poses.iter()
    }
}
