//! `trajview inspect`: models, cameras and frame coverage of a workspace.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use trajectory_io::colmap::{self, CoverageIssue, CAMERAS_FILE};

#[derive(Args)]
pub struct InspectArgs {
    /// The workspace's `sparse/` directory
    #[arg(name = "SPARSE")]
    pub sparse: PathBuf,
}

pub fn run(args: &InspectArgs) -> Result<()> {
    let models = colmap::find_models(&args.sparse)
        .with_context(|| format!("no usable model in {}", args.sparse.display()))?;

    println!();
    println!("{}", format!("Sparse models in {}", args.sparse.display()).bold());
    println!();
    for model in &models {
        let cameras_path = model.path.join(CAMERAS_FILE);
        let cameras = if cameras_path.is_file() {
            let cameras = colmap::read_cameras(&cameras_path)
                .with_context(|| format!("failed to read {}", cameras_path.display()))?;
            cameras
                .iter()
                .map(|c| format!("{:?} {}x{}", c.model, c.width, c.height))
                .collect::<Vec<_>>()
                .join(", ")
        } else {
            "no cameras.bin".dimmed().to_string()
        };
        println!("  Model {}: {} images, {}", model.name(), model.image_count, cameras);
    }

    let report = colmap::analyze_coverage(&args.sparse)?;
    println!();
    println!("{}", "Frame coverage".bold());
    for (i, coverage) in report.models.iter().enumerate() {
        println!(
            "  Model {}: frames {}-{} ({} images, {} points)",
            coverage.name,
            coverage.first_frame,
            coverage.last_frame,
            coverage.image_count,
            coverage.point_count
        );
        for (_, issue) in report.issues.iter().filter(|(at, _)| *at == i) {
            match issue {
                CoverageIssue::Gap { .. } => println!("    {}", issue.to_string().yellow()),
                CoverageIssue::Overlap { .. } => println!("    {}", issue.to_string().cyan()),
            }
        }
    }
    println!();
    println!(
        "{} {} models, {} images",
        "Total:".bold(),
        report.models.len(),
        report.total_images()
    );

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_workspace_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = InspectArgs {
            sparse: dir.path().join("sparse"),
        };
        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("file not found"));
    }

    #[test]
    fn inspects_single_model() {
        let dir = tempfile::tempdir().unwrap();
        let model = dir.path().join("0");
        std::fs::create_dir_all(&model).unwrap();

        let mut images = 1u64.to_le_bytes().to_vec();
        images.extend_from_slice(&1u32.to_le_bytes());
        for v in [1.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0] {
            images.extend_from_slice(&v.to_le_bytes());
        }
        images.extend_from_slice(&1u32.to_le_bytes());
        images.extend_from_slice(b"frame_000004.jpg\0");
        images.extend_from_slice(&0u64.to_le_bytes());
        std::fs::write(model.join("images.bin"), images).unwrap();

        let mut cameras = 1u64.to_le_bytes().to_vec();
        cameras.extend_from_slice(&1i32.to_le_bytes());
        cameras.extend_from_slice(&0i32.to_le_bytes());
        cameras.extend_from_slice(&640u64.to_le_bytes());
        cameras.extend_from_slice(&480u64.to_le_bytes());
        for p in [500.0f64, 320.0, 240.0] {
            cameras.extend_from_slice(&p.to_le_bytes());
        }
        std::fs::write(model.join(CAMERAS_FILE), cameras).unwrap();

        run(&InspectArgs {
            sparse: dir.path().to_path_buf(),
        })
        .unwrap();
    }
}
