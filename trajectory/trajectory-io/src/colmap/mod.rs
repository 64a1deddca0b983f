//! COLMAP sparse-model import.
//!
//! - [`reader`] - `cameras.bin`, `images.bin` and `points3D.bin` parsers
//! - [`models`] - model discovery, selection and merging
//! - [`export`] - conversion into viewer-frame trajectories and clouds
//! - [`coverage`] - frame coverage across split reconstructions

mod binary;
pub mod coverage;
pub mod export;
pub mod models;
pub mod reader;

pub use coverage::{analyze_coverage, frame_number, CoverageIssue, CoverageReport, ModelCoverage};
pub use export::{
    export_trajectory, image_pose, images_to_trajectory, points_to_cloud, to_viewer_point,
    to_viewer_vector, ExportParams, VIEWER_AXES_NOTE,
};
pub use models::{
    find_models, largest_model, merge_models, SparseModel, CAMERAS_FILE, IMAGES_FILE, POINTS_FILE,
};
pub use reader::{
    parse_cameras, parse_images, parse_points3d, read_cameras, read_images, read_points3d,
    CameraModel, ColmapCamera, ColmapImage, ColmapPoint,
};
