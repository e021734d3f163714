//! Stage command lines
//!
//! Every path is passed explicitly so a stage never depends on the
//! engine's current directory.

use std::path::Path;

use crate::domain::ports::ExternalCommand;
use crate::domain::value_objects::{Stage, WorkingDirectory};

use super::options::EngineOptions;

/// Build the engine invocation for `stage`
pub fn stage_command(
    stage: Stage,
    engine: &EngineOptions,
    work: &WorkingDirectory,
    frames_dir: &Path,
) -> ExternalCommand {
    let cmd = ExternalCommand::new(&engine.program).arg(stage.tool());

    let cmd = match stage {
        Stage::FeatureExtraction => cmd
            .path_arg("--database_path", &work.database())
            .path_arg("--image_path", frames_dir),
        Stage::ExhaustiveMatching => cmd.path_arg("--database_path", &work.database()),
        Stage::Mapping => cmd
            .path_arg("--database_path", &work.database())
            .path_arg("--image_path", frames_dir)
            .path_arg("--output_path", &work.sparse_dir()),
        Stage::Undistortion => cmd
            .path_arg("--image_path", frames_dir)
            .path_arg("--input_path", &work.sparse_model(engine.sparse_model))
            .path_arg("--output_path", &work.dense_dir())
            .args(["--output_type", "COLMAP"]),
        Stage::DenseStereo => cmd
            .path_arg("--workspace_path", &work.dense_dir())
            .args(["--workspace_format", "COLMAP"]),
        Stage::Fusion => cmd
            .path_arg("--workspace_path", &work.dense_dir())
            .args(["--workspace_format", "COLMAP", "--input_type", "geometric"])
            .path_arg("--output_path", &work.fused_ply()),
        Stage::Meshing => cmd
            .path_arg("--input_path", &work.fused_ply())
            .path_arg("--output_path", &work.mesh_ply()),
    };

    cmd.args(engine.extra_args_for(stage.tool()))
}
