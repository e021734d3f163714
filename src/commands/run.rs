//! Run command handler
//!
//! The whole pipeline: sample, reconstruct, export, then optionally view
//! the first exported mesh.

use std::path::Path;

use anyhow::Result;
use tracing::debug;

use walkmesh::domain::value_objects::{is_populated, WorkingDirectory};
use walkmesh::presentation::factory;
use walkmesh::presentation::RunReport;

use super::view::print_summary;
use super::CommandContext;

pub struct RunArgs<'a> {
    pub video: &'a Path,
    pub work: &'a Path,
    pub fps: Option<f64>,
    pub max_frames: Option<usize>,
    pub export_dir: Option<&'a Path>,
    pub view: bool,
}

pub fn cmd_run(ctx: &CommandContext, args: RunArgs<'_>) -> Result<()> {
    let options = factory::sampling_options(&ctx.config, args.fps, args.max_frames)?;
    let work = WorkingDirectory::new(args.work);
    let sink = ctx.event_sink();

    // Frames from an earlier, longer run would otherwise be reconstructed too
    let frames_dir = work.frames_dir();
    if is_populated(&frames_dir) {
        debug!(dir = %frames_dir.display(), "clearing previous frames");
        std::fs::remove_dir_all(&frames_dir)?;
    }

    let sampled =
        factory::create_frame_sampler(&ctx.config).sample(args.video, &frames_dir, &options, &*sink)?;

    let manifest =
        factory::create_reconstruct_use_case(&ctx.config).execute(&sampled.output_dir, &work, &*sink)?;

    let plan = factory::export_plan(&ctx.config, args.export_dir);
    let exported = factory::create_export_use_case().export_manifest(&manifest, &plan, &*sink)?;

    let mut report = RunReport::new();
    report.add_frames(&sampled);
    report.add_manifest(&manifest);
    report.add_exports(&exported);
    report.print(ctx.json, ctx.color);

    if args.view {
        if let Some(mesh) = plan.mesh_destinations().first() {
            factory::create_view_use_case(&ctx.config)
                .view_with(mesh, |summary| print_summary(ctx, mesh, summary))?;
        }
    }

    Ok(())
}
