//! Conversion of COLMAP poses and points into the viewer frame.
//!
//! COLMAP world coordinates are flipped on X and Y to reach the viewer
//! convention (X right, Y up, Z forward). The same flip is applied to
//! positions, viewing directions and reconstructed points so every layer
//! stays consistent.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use tracing::info;
use trajectory_types::{PointCloud, Pose, Trajectory};

use super::reader::{ColmapImage, ColmapPoint};
use crate::document::TrajectoryDocument;
use crate::error::IoResult;

/// Note written into exported metadata.
pub const VIEWER_AXES_NOTE: &str = "Coordinate system: X=right, Y=up, Z=forward";

/// Parameters for trajectory export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportParams {
    /// Playback frame rate assigned to the exported frames.
    ///
    /// Default: 12.0
    pub fps: f64,

    /// Keep only images whose name contains this substring.
    ///
    /// Default: None
    pub video_filter: Option<String>,
}

impl Default for ExportParams {
    fn default() -> Self {
        Self {
            fps: 12.0,
            video_filter: None,
        }
    }
}

impl ExportParams {
    /// Set the frame rate.
    #[must_use]
    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    /// Restrict export to one video's frames.
    #[must_use]
    pub fn video_filter(mut self, filter: impl Into<String>) -> Self {
        self.video_filter = Some(filter.into());
        self
    }
}

/// Map a COLMAP world point into the viewer frame.
#[must_use]
pub fn to_viewer_point(p: &Point3<f64>) -> Point3<f64> {
    Point3::new(-p.x, -p.y, p.z)
}

/// Map a COLMAP world direction into the viewer frame.
#[must_use]
pub fn to_viewer_vector(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-v.x, -v.y, v.z)
}

/// Viewer-frame pose of one registered image.
///
/// The position is the camera centre `-Rᵀ t`; the forward direction is
/// `R · (0, 0, -1)`, both flipped into viewer axes.
#[must_use]
pub fn image_pose(image: &ColmapImage) -> Pose {
    let rotation = image.rotation();
    let forward = rotation * Vector3::new(0.0, 0.0, -1.0);

    Pose::from_position(to_viewer_point(&image.center()))
        .with_rotation(rotation)
        .with_forward(to_viewer_vector(&forward))
        .with_image_name(image.name.clone())
}

/// Build the viewer trajectory from registered images.
///
/// Images are filtered by [`ExportParams::video_filter`] and put in temporal
/// order by sorting on their names.
///
/// # Errors
///
/// Returns [`IoError::Trajectory`](crate::IoError::Trajectory) if the frame
/// rate is invalid or a pose is not finite.
pub fn images_to_trajectory(images: &[ColmapImage], params: &ExportParams) -> IoResult<Trajectory> {
    let mut selected: Vec<&ColmapImage> = images
        .iter()
        .filter(|im| {
            params
                .video_filter
                .as_deref()
                .is_none_or(|filter| im.name.contains(filter))
        })
        .collect();
    selected.sort_by(|a, b| a.name.cmp(&b.name));

    let poses = selected.into_iter().map(image_pose).collect();
    Ok(Trajectory::new(poses, params.fps)?)
}

/// Export registered images as a trajectory document with metadata.
///
/// # Errors
///
/// Same as [`images_to_trajectory`].
pub fn export_trajectory(
    images: &[ColmapImage],
    params: &ExportParams,
) -> IoResult<TrajectoryDocument> {
    let trajectory = images_to_trajectory(images, params)?;
    info!(
        frames = trajectory.len(),
        filtered_out = images.len() - trajectory.len(),
        fps = trajectory.fps(),
        duration = trajectory.duration(),
        "Exported trajectory"
    );
    Ok(TrajectoryDocument::from_trajectory(&trajectory).with_note(VIEWER_AXES_NOTE))
}

/// Coloured point cloud in viewer axes.
#[must_use]
pub fn points_to_cloud(points: &[ColmapPoint]) -> PointCloud {
    let positions = points.iter().map(|p| to_viewer_point(&p.position)).collect();
    let colors = points.iter().map(|p| p.rgb).collect();
    PointCloud::with_colors(positions, colors).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::colmap::reader::fixtures;
    use approx::assert_relative_eq;

    const IDENTITY: [f64; 4] = [1.0, 0.0, 0.0, 0.0];

    #[test]
    fn identity_pose_flips_axes() {
        let image = fixtures::image(1, "frame_000000.jpg", IDENTITY, [1.0, 2.0, 3.0]);
        let pose = image_pose(&image);

        // C = -t = (-1, -2, -3), flipped to (1, 2, -3).
        assert_relative_eq!(pose.position, Point3::new(1.0, 2.0, -3.0), epsilon = 1e-12);
        // R · (0, 0, -1) = (0, 0, -1), flip leaves Z.
        assert_relative_eq!(pose.forward.unwrap(), Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert_eq!(pose.image_name.as_deref(), Some("frame_000000.jpg"));
    }

    #[test]
    fn rotated_camera_forward() {
        // 180 degrees about Y.
        let image = fixtures::image(1, "a.jpg", [0.0, 0.0, 1.0, 0.0], [0.0; 3]);
        let pose = image_pose(&image);
        assert_relative_eq!(pose.forward.unwrap(), Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn sorted_by_name_and_filtered() {
        let images = vec![
            fixtures::image(1, "clip_2_frame_000001.jpg", IDENTITY, [0.0, 0.0, -1.0]),
            fixtures::image(2, "clip_1_frame_000002.jpg", IDENTITY, [0.0, 0.0, -2.0]),
            fixtures::image(3, "clip_1_frame_000001.jpg", IDENTITY, [0.0, 0.0, -3.0]),
        ];

        let all = images_to_trajectory(&images, &ExportParams::default()).unwrap();
        let names: Vec<_> = all.iter().map(|p| p.image_name.clone().unwrap()).collect();
        assert_eq!(
            names,
            [
                "clip_1_frame_000001.jpg",
                "clip_1_frame_000002.jpg",
                "clip_2_frame_000001.jpg"
            ]
        );

        let params = ExportParams::default().video_filter("clip_1");
        let filtered = images_to_trajectory(&images, &params).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_relative_eq!(filtered.at(1).unwrap().position.z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn document_timestamps_and_note() {
        let images: Vec<_> = (0..24)
            .map(|i| {
                fixtures::image(i, &format!("frame_{i:06}.jpg"), IDENTITY, [0.0, 0.0, f64::from(i)])
            })
            .collect();
        let document = export_trajectory(&images, &ExportParams::default()).unwrap();

        assert_eq!(document.total_frames, Some(24));
        assert_relative_eq!(document.duration.unwrap(), 2.0);
        assert_relative_eq!(document.frames[6].timestamp.unwrap(), 0.5);
        let note = document.metadata.unwrap().note.unwrap();
        assert!(note.contains("Y=up"));
    }

    #[test]
    fn invalid_fps_is_rejected() {
        let params = ExportParams::default().fps(0.0);
        assert!(images_to_trajectory(&[], &params).is_err());
    }

    #[test]
    fn points_keep_colour_and_flip() {
        let points = [ColmapPoint {
            id: 1,
            position: Point3::new(1.0, 2.0, 3.0),
            rgb: [9, 8, 7],
            error: 0.1,
            track_length: 2,
        }];
        let cloud = points_to_cloud(&points);
        assert_eq!(cloud.points, vec![Point3::new(-1.0, -2.0, 3.0)]);
        assert_eq!(cloud.colors, Some(vec![[9, 8, 7]]));
    }

    #[test]
    fn params_from_partial_json() {
        let params: ExportParams = serde_json::from_str(r#"{"video_filter": "clip_6"}"#).unwrap();
        assert!((params.fps - 12.0).abs() < f64::EPSILON);
        assert_eq!(params.video_filter.as_deref(), Some("clip_6"));
    }
}
