//! walkmesh CLI - walkthrough video to mesh and point cloud
//!
//! Usage: walkmesh [--json] [-v...] [--config PATH] <COMMAND>
//!
//! Commands:
//!   run          Sample, reconstruct, export and optionally view
//!   sample       Decimate a video into an ordered frame directory
//!   reconstruct  Run the six reconstruction stages over a frame directory
//!   export       Export mesh and point cloud from a finished working directory
//!   view         Open a mesh or point cloud in the viewer

mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use walkmesh::presentation::{Cli, Commands};

use commands::run::RunArgs;
use commands::CommandContext;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::load(&cli)?;

    match &cli.command {
        Commands::Run {
            video,
            work,
            fps,
            max_frames,
            export_dir,
            view,
        } => commands::run::cmd_run(
            &ctx,
            RunArgs {
                video,
                work,
                fps: *fps,
                max_frames: *max_frames,
                export_dir: export_dir.as_deref(),
                view: *view,
            },
        ),
        Commands::Sample {
            video,
            out,
            fps,
            max_frames,
        } => commands::sample::cmd_sample(&ctx, video, out, *fps, *max_frames),
        Commands::Reconstruct { frames, work } => {
            commands::reconstruct::cmd_reconstruct(&ctx, frames, work)
        }
        Commands::Export { work, export_dir } => {
            commands::export::cmd_export(&ctx, work, export_dir.as_deref())
        }
        Commands::View { path } => commands::view::cmd_view(&ctx, path),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("walkmesh={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
