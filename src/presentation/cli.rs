//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! ## Design Notes
//!
//! - Global flags (--json, --color, --verbose, --config) are inherited by all subcommands
//! - Sampling flags left unset fall back to the resolved configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// walkmesh - walkthrough video to mesh and point cloud
#[derive(Parser, Debug)]
#[command(name = "walkmesh")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Requires colmap and ffmpeg on PATH (or configured in walkmesh.toml).")]
pub struct Cli {
    /// Emit NDJSON progress events instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./walkmesh.toml, then the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample, reconstruct, export and optionally view in one go
    Run {
        /// Walkthrough video
        #[arg(long)]
        video: PathBuf,

        /// Working directory for intermediate artifacts
        #[arg(long, default_value = "work")]
        work: PathBuf,

        /// Target sampling rate in frames per second
        #[arg(long)]
        fps: Option<f64>,

        /// Maximum number of frames to keep
        #[arg(long)]
        max_frames: Option<usize>,

        /// Directory for exported artifacts
        #[arg(long)]
        export_dir: Option<PathBuf>,

        /// Open the exported mesh in the viewer afterwards
        #[arg(long)]
        view: bool,
    },

    /// Decimate a video into an ordered frame directory
    Sample {
        /// Walkthrough video
        #[arg(long)]
        video: PathBuf,

        /// Output directory for frame_NNNNNN.jpg files
        #[arg(long)]
        out: PathBuf,

        /// Target sampling rate in frames per second
        #[arg(long)]
        fps: Option<f64>,

        /// Maximum number of frames to keep
        #[arg(long)]
        max_frames: Option<usize>,
    },

    /// Run the six reconstruction stages over a frame directory
    Reconstruct {
        /// Directory of sampled frames
        #[arg(long)]
        frames: PathBuf,

        /// Working directory for intermediate artifacts
        #[arg(long, default_value = "work")]
        work: PathBuf,
    },

    /// Export mesh and point cloud from a finished working directory
    Export {
        /// Working directory holding manifest.json
        #[arg(long, default_value = "work")]
        work: PathBuf,

        /// Directory for exported artifacts
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Open a mesh or point cloud in the viewer
    View {
        /// Artifact to display (.ply, .obj, .glb, .gltf, .xyz, .xyzn, .xyzrgb)
        path: PathBuf,
    },
}
