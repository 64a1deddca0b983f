//! `trajview export`: COLMAP sparse model to trajectory JSON and PLY.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::warn;
use trajectory_io::colmap::{self, ExportParams, SparseModel, IMAGES_FILE};
use trajectory_io::{save_document, save_point_cloud};

#[derive(Args)]
pub struct ExportArgs {
    /// The workspace's `sparse/` directory
    #[arg(name = "SPARSE")]
    pub sparse: PathBuf,

    /// Use this model directory instead of the largest one
    #[arg(long, conflicts_with = "merge")]
    pub model: Option<PathBuf>,

    /// Concatenate the images of every model
    #[arg(long)]
    pub merge: bool,

    /// Keep only frames whose image name contains this text
    #[arg(long)]
    pub video: Option<String>,

    /// Playback frame rate
    #[arg(long, default_value_t = 12.0)]
    pub fps: f64,

    /// Trajectory JSON output
    #[arg(short, long, default_value = "trajectory.json")]
    pub output: PathBuf,

    /// Also write the model's points as a PLY cloud
    #[arg(long)]
    pub cloud: Option<PathBuf>,

    /// Write the cloud as ASCII instead of binary
    #[arg(long)]
    pub ascii: bool,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let (model, images) = if let Some(dir) = &args.model {
        let images = colmap::read_images(dir.join(IMAGES_FILE))
            .with_context(|| format!("failed to read model {}", dir.display()))?;
        let model = SparseModel {
            path: dir.clone(),
            image_count: images.len(),
        };
        (model, images)
    } else {
        let model = colmap::largest_model(&args.sparse)
            .with_context(|| format!("no usable model in {}", args.sparse.display()))?;
        let images = if args.merge {
            colmap::merge_models(&args.sparse)?
        } else {
            colmap::read_images(model.images_path())?
        };
        (model, images)
    };

    let mut params = ExportParams::default().fps(args.fps);
    if let Some(video) = &args.video {
        params = params.video_filter(video.clone());
    }

    let document = colmap::export_trajectory(&images, &params)?;
    if document.frames.is_empty() {
        warn!("No frames left to export");
    }
    save_document(&document, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!(
        "{} {} frames -> {}",
        "Exported".green().bold(),
        document.frames.len(),
        args.output.display()
    );

    if let Some(cloud_path) = &args.cloud {
        if args.merge {
            warn!(
                model = %model.name(),
                "Models do not share a frame; exporting the largest model's points only"
            );
        }
        let points = colmap::read_points3d(model.points_path())
            .with_context(|| format!("failed to read points of {}", model.path.display()))?;
        let cloud = colmap::points_to_cloud(&points);
        save_point_cloud(&cloud, cloud_path, !args.ascii)
            .with_context(|| format!("failed to write {}", cloud_path.display()))?;
        println!(
            "{} {} points -> {}",
            "Exported".green().bold(),
            cloud.len(),
            cloud_path.display()
        );
    }

    Ok(())
}
