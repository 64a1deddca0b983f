//! `trajview align`: fit the walking surface and write levelled copies.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use trajectory_align::{align_trajectory, GroundAlignment, GroundParams};
use trajectory_io::{load_point_cloud, load_trajectory, save_point_cloud, save_trajectory};
use trajectory_types::{Pose, Trajectory};

use crate::config::load_or_default;

#[derive(Args)]
pub struct AlignArgs {
    /// Trajectory JSON document
    #[arg(name = "TRAJECTORY")]
    pub trajectory: PathBuf,

    /// Ground detection parameters (JSON; missing keys use defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the levelled trajectory here
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Point cloud to level with the same transform
    #[arg(long, requires = "cloud_output")]
    pub cloud: Option<PathBuf>,

    /// Where to write the levelled cloud
    #[arg(long, requires = "cloud")]
    pub cloud_output: Option<PathBuf>,

    /// Write the cloud as ASCII instead of binary
    #[arg(long)]
    pub ascii: bool,
}

/// Apply `alignment` to every pose.
///
/// Positions and viewing directions move into the levelled frame; the
/// stored orientation is left as recorded.
pub fn level_trajectory(trajectory: &Trajectory, alignment: &GroundAlignment) -> Result<Trajectory> {
    let poses = trajectory
        .iter()
        .map(|pose| Pose {
            position: alignment.apply_point(&pose.position),
            forward: pose.forward.map(|f| alignment.apply_vector(&f)),
            ..pose.clone()
        })
        .collect();
    Ok(Trajectory::new(poses, trajectory.fps())?)
}

pub fn run(args: &AlignArgs) -> Result<()> {
    let params: GroundParams = load_or_default(args.config.as_deref())?;
    let trajectory = load_trajectory(&args.trajectory)
        .with_context(|| format!("failed to load {}", args.trajectory.display()))?;
    let fit = align_trajectory(&trajectory, &params)
        .with_context(|| format!("cannot fit ground of {}", args.trajectory.display()))?;

    let normal = fit.alignment.normal();
    println!();
    println!("{}", "Ground alignment".bold());
    println!("  {}", fit.report);
    println!(
        "  normal ({:.4}, {:.4}, {:.4}), tilt {:.2} deg, vertical offset {:.4}",
        normal.x,
        normal.y,
        normal.z,
        fit.alignment.tilt_degrees(),
        fit.alignment.vertical_offset()
    );
    if fit.report.used_fallback {
        println!(
            "  {}",
            "Too few flat windows; used the flattest by rank".yellow()
        );
    }

    if let Some(output) = &args.output {
        let levelled = level_trajectory(&trajectory, &fit.alignment)?;
        save_trajectory(&levelled, output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("{} {}", "Wrote".green().bold(), output.display());
    }

    if let (Some(input), Some(output)) = (&args.cloud, &args.cloud_output) {
        let cloud = load_point_cloud(input)
            .with_context(|| format!("failed to load {}", input.display()))?;
        let levelled = cloud.map_points(|p| fit.alignment.apply_point(p));
        save_point_cloud(&levelled, output, !args.ascii)
            .with_context(|| format!("failed to write {}", output.display()))?;
        println!("{} {}", "Wrote".green().bold(), output.display());
    }

    Ok(())
}
