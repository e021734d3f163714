//! View command handler

use std::path::Path;

use anyhow::Result;

use walkmesh::application::GeometrySummary;
use walkmesh::presentation::factory;
use walkmesh::presentation::output::render_summary;

use super::CommandContext;

pub fn cmd_view(ctx: &CommandContext, path: &Path) -> Result<()> {
    let use_case = factory::create_view_use_case(&ctx.config);
    use_case.view_with(path, |summary| print_summary(ctx, path, summary))?;
    Ok(())
}

/// Print what is about to be shown
pub(crate) fn print_summary(ctx: &CommandContext, path: &Path, summary: &GeometrySummary) {
    if ctx.json {
        let bounds = summary.bounds.map(|b| serde_json::json!({ "min": b.min, "max": b.max }));
        println!(
            "{}",
            serde_json::json!({
                "event": "view",
                "path": path.display().to_string(),
                "kind": summary.kind,
                "vertices": summary.vertices,
                "triangles": summary.triangles,
                "bounds": bounds,
            })
        );
    } else {
        println!("{}", render_summary(path, summary));
    }
}
