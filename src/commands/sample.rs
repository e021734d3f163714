//! Sample command handler
//!
//! Decimates a video into a frame directory.

use std::path::Path;

use anyhow::Result;

use walkmesh::presentation::factory;
use walkmesh::presentation::RunReport;

use super::CommandContext;

pub fn cmd_sample(
    ctx: &CommandContext,
    video: &Path,
    out: &Path,
    fps: Option<f64>,
    max_frames: Option<usize>,
) -> Result<()> {
    let options = factory::sampling_options(&ctx.config, fps, max_frames)?;
    let sink = ctx.event_sink();

    let result = factory::create_frame_sampler(&ctx.config).sample(video, out, &options, &*sink)?;

    let mut report = RunReport::new();
    report.add_frames(&result);
    report.print(ctx.json, ctx.color);
    Ok(())
}
