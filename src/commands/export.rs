//! Export command handler
//!
//! Exports from the manifest a previous `reconstruct` left in the working
//! directory.

use std::path::Path;

use anyhow::Result;

use walkmesh::domain::entities::ReconstructionManifest;
use walkmesh::domain::value_objects::WorkingDirectory;
use walkmesh::presentation::factory;
use walkmesh::presentation::RunReport;
use walkmesh::WalkmeshError;

use super::CommandContext;

pub fn cmd_export(ctx: &CommandContext, work: &Path, export_dir: Option<&Path>) -> Result<()> {
    let work = WorkingDirectory::new(work);
    let manifest_path = work.manifest_file();
    if !manifest_path.is_file() {
        return Err(WalkmeshError::ManifestNotFound {
            path: manifest_path,
        }
        .into());
    }
    let manifest = ReconstructionManifest::load(&manifest_path)?;

    let plan = factory::export_plan(&ctx.config, export_dir);
    let sink = ctx.event_sink();
    let exported = factory::create_export_use_case().export_manifest(&manifest, &plan, &*sink)?;

    let mut report = RunReport::new();
    report.add_exports(&exported);
    report.print(ctx.json, ctx.color);
    Ok(())
}
