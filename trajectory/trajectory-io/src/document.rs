//! The JSON trajectory document.
//!
//! ```json
//! {
//!   "frames": [
//!     {"timestamp": 0.0, "position": [0.1, 1.2, 3.4],
//!      "rotation": [1.0, 0.0, 0.0, 0.0], "forward": [0.0, 0.0, 1.0],
//!      "image_name": "frame_000000.jpg"}
//!   ],
//!   "total_frames": 1, "fps": 12.0, "duration": 0.083,
//!   "metadata": {"centroid": [0.1, 1.2, 3.4], "y_range": 0.0}
//! }
//! ```
//!
//! Only `frames[*].position` and `fps` are required when reading. Per-frame
//! timestamps in a file are informational; a loaded [`Trajectory`] derives
//! them from index and frame rate.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trajectory_types::{Pose, Trajectory};

use crate::error::{IoError, IoResult};

/// One serialized frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    /// Seconds since the first frame (informational on input).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    /// Camera centre `[x, y, z]` in the viewer frame.
    pub position: [f64; 3],
    /// Orientation quaternion `[w, x, y, z]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f64; 4]>,
    /// Viewing direction `[x, y, z]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forward: Option<[f64; 3]>,
    /// Source image file name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_name: Option<String>,
}

/// Summary statistics written alongside the frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryMetadata {
    /// Mean camera position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<[f64; 3]>,
    /// Spread of the vertical coordinate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_range: Option<f64>,
    /// Free-form description of the coordinate convention or source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Serialized form of a [`Trajectory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryDocument {
    /// Frames in capture order.
    pub frames: Vec<FrameRecord>,
    /// Number of frames, as written by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_frames: Option<usize>,
    /// Capture frame rate.
    pub fps: f64,
    /// Length in seconds, as written by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Optional summary block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TrajectoryMetadata>,
}

impl TrajectoryDocument {
    /// Build a document with derived timestamps and computed metadata.
    #[must_use]
    pub fn from_trajectory(trajectory: &Trajectory) -> Self {
        let fps = trajectory.fps();
        #[allow(clippy::cast_precision_loss)]
        let frames = trajectory
            .iter()
            .enumerate()
            .map(|(i, pose)| FrameRecord {
                timestamp: Some(i as f64 / fps),
                position: pose.position.coords.into(),
                rotation: pose.rotation.map(|q| [q.w, q.i, q.j, q.k]),
                forward: pose.forward.map(Into::into),
                image_name: pose.image_name.clone(),
            })
            .collect();

        Self {
            frames,
            total_frames: Some(trajectory.len()),
            fps,
            duration: Some(trajectory.duration()),
            metadata: Some(TrajectoryMetadata::describe(trajectory)),
        }
    }

    /// Attach a note to the metadata block.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.metadata.get_or_insert_with(TrajectoryMetadata::default).note = Some(note.into());
        self
    }

    /// Convert into a validated [`Trajectory`].
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Trajectory`] for a bad frame rate or non-finite
    /// position, and [`IoError::InvalidContent`] for a zero or non-finite
    /// rotation quaternion.
    pub fn into_trajectory(self) -> IoResult<Trajectory> {
        if let Some(total) = self.total_frames {
            if total != self.frames.len() {
                warn!(
                    total_frames = total,
                    frames = self.frames.len(),
                    "total_frames disagrees with frame list; using the list"
                );
            }
        }

        let poses = self
            .frames
            .into_iter()
            .enumerate()
            .map(|(index, frame)| frame.into_pose(index))
            .collect::<IoResult<Vec<_>>>()?;

        Ok(Trajectory::new(poses, self.fps)?)
    }
}

impl FrameRecord {
    fn into_pose(self, index: usize) -> IoResult<Pose> {
        let [x, y, z] = self.position;
        let mut pose = Pose::from_position(Point3::new(x, y, z));

        if let Some([w, i, j, k]) = self.rotation {
            let q = Quaternion::new(w, i, j, k);
            let norm = q.norm();
            if !norm.is_finite() || norm <= f64::EPSILON {
                return Err(IoError::invalid_content(format!(
                    "frame {index} has a degenerate rotation quaternion"
                )));
            }
            pose = pose.with_rotation(UnitQuaternion::from_quaternion(q));
        }
        if let Some(forward) = self.forward {
            pose = pose.with_forward(Vector3::from(forward));
        }
        if let Some(name) = self.image_name {
            pose = pose.with_image_name(name);
        }
        Ok(pose)
    }
}

impl TrajectoryMetadata {
    /// Centroid and vertical range of a trajectory's positions.
    #[must_use]
    pub fn describe(trajectory: &Trajectory) -> Self {
        if trajectory.is_empty() {
            return Self::default();
        }

        #[allow(clippy::cast_precision_loss)]
        let n = trajectory.len() as f64;
        let sum = trajectory
            .positions()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let (lo, hi) = trajectory
            .positions()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.y), hi.max(p.y))
            });

        Self {
            centroid: Some((sum / n).into()),
            y_range: Some(hi - lo),
            note: None,
        }
    }
}

/// Read a trajectory document without validating it.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or is not a valid document.
pub fn load_document<P: AsRef<Path>>(path: P) -> IoResult<TrajectoryDocument> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| IoError::from_open(e, path))?;
    let document: TrajectoryDocument = serde_json::from_reader(BufReader::new(file))?;
    debug!(path = %path.display(), frames = document.frames.len(), "Read trajectory document");
    Ok(document)
}

/// Write a trajectory document as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_document<P: AsRef<Path>>(document: &TrajectoryDocument, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)?;
    writer.flush()?;
    Ok(())
}

/// Load and validate a trajectory.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, or if its content
/// does not form a valid trajectory.
///
/// # Example
///
/// ```no_run
/// use trajectory_io::load_trajectory;
///
/// let trajectory = load_trajectory("trajectory.json").unwrap();
/// println!("{} frames at {} fps", trajectory.len(), trajectory.fps());
/// ```
pub fn load_trajectory<P: AsRef<Path>>(path: P) -> IoResult<Trajectory> {
    load_document(path)?.into_trajectory()
}

/// Save a trajectory with derived timestamps and metadata.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_trajectory<P: AsRef<Path>>(trajectory: &Trajectory, path: P) -> IoResult<()> {
    save_document(&TrajectoryDocument::from_trajectory(trajectory), path)
}
