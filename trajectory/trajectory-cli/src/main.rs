//! `trajview` - camera trajectories from walking videos, levelled and replayed.
//!
//! # Commands
//!
//! - `trajview export <SPARSE>` - Convert a COLMAP sparse model into trajectory JSON (+ PLY)
//! - `trajview inspect <SPARSE>` - Report models, cameras and frame coverage
//! - `trajview align <TRAJECTORY>` - Fit the walking surface and write levelled outputs
//! - `trajview play <TRAJECTORY>` - Headless playback through the viewer context
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence over `-v`.

mod align;
mod config;
mod export;
mod inspect;
mod play;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// Walking-video trajectory tools
#[derive(Parser)]
#[command(name = "trajview")]
#[command(about = "Export, level and replay camera trajectories", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a COLMAP sparse model into a trajectory document
    Export(export::ExportArgs),

    /// Summarise the sparse models of a COLMAP workspace
    Inspect(inspect::InspectArgs),

    /// Fit the ground plane of a trajectory and level the scene
    Align(align::AlignArgs),

    /// Replay a trajectory headlessly
    Play(play::PlayArgs),
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Export(args) => export::run(&args),
        Commands::Inspect(args) => inspect::run(&args),
        Commands::Align(args) => align::run(&args),
        Commands::Play(args) => play::run(&args),
    }
}
