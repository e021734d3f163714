//! Reconstruct command handler

use std::path::Path;

use anyhow::Result;

use walkmesh::domain::value_objects::WorkingDirectory;
use walkmesh::presentation::factory;
use walkmesh::presentation::RunReport;

use super::CommandContext;

pub fn cmd_reconstruct(ctx: &CommandContext, frames: &Path, work: &Path) -> Result<()> {
    let work = WorkingDirectory::new(work);
    let sink = ctx.event_sink();

    let manifest = factory::create_reconstruct_use_case(&ctx.config).execute(frames, &work, &*sink)?;

    let mut report = RunReport::new();
    report.add_manifest(&manifest);
    report.add("manifest", work.manifest_file());
    report.print(ctx.json, ctx.color);
    Ok(())
}
