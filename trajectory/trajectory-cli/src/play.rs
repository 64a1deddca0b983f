//! `trajview play`: drive the viewer context without a window.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use owo_colors::OwoColorize;
use trajectory_playback::{FrameUpdate, ScenePaths, Viewer, ViewerParams};

use crate::config::load_or_default;

#[derive(Args)]
pub struct PlayArgs {
    /// Trajectory JSON document
    #[arg(name = "TRAJECTORY")]
    pub trajectory: PathBuf,

    /// Point cloud shown under the trajectory
    #[arg(long)]
    pub cloud: Option<PathBuf>,

    /// Viewer parameters (JSON; missing keys use defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start from this frame (clamped)
    #[arg(long, allow_hyphen_values = true)]
    pub seek: Option<i64>,

    /// Number of render ticks to run (default: one pass over the trajectory)
    #[arg(long)]
    pub ticks: Option<usize>,

    /// Print every n-th frame
    #[arg(long, default_value_t = 1)]
    pub every: usize,
}

/// Run the render loop for `ticks` frames and collect what it produced.
pub fn replay(viewer: &mut Viewer, ticks: usize) -> Vec<FrameUpdate> {
    (0..ticks).filter_map(|_| viewer.on_frame()).collect()
}

pub fn run(args: &PlayArgs) -> Result<()> {
    let params: ViewerParams = load_or_default(args.config.as_deref())?;
    let paths = ScenePaths {
        trajectory: Some(args.trajectory.clone()),
        cloud: args.cloud.clone(),
    };
    let mut viewer = Viewer::load(&paths, &params)?;
    if !viewer.playback().is_enabled() {
        bail!("nothing to play in {}", args.trajectory.display());
    }

    if let Some(report) = viewer.ground_report() {
        println!("{} {}", "Ground:".bold(), report);
    }
    if let Some(rate) = viewer.replay_rate() {
        println!("{} {}", "Replay:".bold(), rate);
    }
    if let Some(frame) = args.seek {
        viewer.seek(frame);
    }

    viewer.toggle();
    let ticks = args.ticks.unwrap_or(viewer.playback().frame_count());
    let every = args.every.max(1);
    for update in replay(&mut viewer, ticks).iter().step_by(every) {
        let p = update.marker.position;
        println!(
            "  frame {:>5}  t={:>8.3}s  ({:.3}, {:.3}, {:.3})",
            update.frame, update.timestamp, p.x, p.y, p.z
        );
    }

    viewer.reset();
    println!("{}", "Playback finished".green());
    Ok(())
}
