//! Reconstruct Use Case
//!
//! Runs the engine stages strictly in order over one working directory:
//! 1. Feature extraction (after deleting any stale database)
//! 2. Exhaustive matching
//! 3. Mapping, which must leave at least one sparse sub-model
//! 4. Undistortion of the chosen sub-model
//! 5. Dense stereo
//! 6. Fusion, then meshing
//!
//! Every stage is followed by an artifact check: its outputs must exist, be
//! non-empty and differ from what was on disk before it launched. The first
//! failure aborts the run and leaves everything already produced on disk.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::domain::entities::{
    populated_sub_models, FrameSet, ReconstructionManifest, SparseModelSummary,
};
use crate::domain::ports::{PipelineEvent, PipelineEventSink, StageRunner};
use crate::domain::value_objects::{is_populated, ArtifactSnapshot, Stage, WorkingDirectory};
use crate::error::{WalkmeshError, WalkmeshResult};

use super::commands::stage_command;
use super::options::EngineOptions;

/// Reconstruct use case - sequences the external stages
///
/// Parameterized by the stage runner so tests can substitute a fake engine.
pub struct ReconstructUseCase<R>
where
    R: StageRunner,
{
    runner: R,
    engine: EngineOptions,
}

impl<R> ReconstructUseCase<R>
where
    R: StageRunner,
{
    pub fn new(runner: R, engine: EngineOptions) -> Self {
        Self { runner, engine }
    }

    pub fn engine(&self) -> &EngineOptions {
        &self.engine
    }

    /// Reconstruct `frames_dir` into `work`
    ///
    /// On success the manifest has been validated and persisted to
    /// `work/manifest.json`.
    pub fn execute(
        &self,
        frames_dir: &Path,
        work: &WorkingDirectory,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<ReconstructionManifest> {
        let started_at = Utc::now();
        let frames_dir = absolute(frames_dir)?;
        let frames = FrameSet::scan(&frames_dir)?;

        work.prepare()?;

        events.on_event(PipelineEvent::ReconstructionStarted {
            frames_dir: frames_dir.clone(),
            work_dir: work.root().to_path_buf(),
            database: work.database(),
            frame_count: frames.len(),
        });

        self.remove_stale_manifest(work)?;
        self.remove_stale_database(work, events)?;

        let mut fresh_models = Vec::new();
        for stage in Stage::ALL {
            self.check_precondition(stage, work, &fresh_models)?;
            let outputs = stage_outputs(stage, work);
            let before = ArtifactSnapshot::capture_all(&outputs);
            self.run_stage(stage, work, &frames_dir, events)?;
            if let Some(models) =
                self.check_postcondition(stage, work, &outputs, &before, events)?
            {
                fresh_models = models;
            }
        }

        let manifest = ReconstructionManifest {
            work_dir: work.root().to_path_buf(),
            frames_dir,
            sparse_model: work.sparse_model(self.engine.sparse_model),
            dense_fused_ply: work.fused_ply(),
            mesh_ply: work.mesh_ply(),
            started_at: Some(started_at),
            finished_at: Some(Utc::now()),
        };
        manifest.validate()?;
        manifest.save(&work.manifest_file())?;

        events.on_event(PipelineEvent::ReconstructionCompleted {
            fused_ply: manifest.dense_fused_ply.clone(),
            mesh_ply: manifest.mesh_ply.clone(),
        });

        Ok(manifest)
    }

    /// A manifest from a previous run must not outlive a failed re-run
    fn remove_stale_manifest(&self, work: &WorkingDirectory) -> WalkmeshResult<()> {
        let path = work.manifest_file();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed manifest of previous run");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// A database from a previous run must never be reused
    fn remove_stale_database(
        &self,
        work: &WorkingDirectory,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<()> {
        for path in work.database_files() {
            match std::fs::remove_file(&path) {
                Ok(()) => events.on_event(PipelineEvent::StaleDatabaseRemoved { path }),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Undistortion reads exactly one sub-model, which this run's mapper
    /// must have written
    fn check_precondition(
        &self,
        stage: Stage,
        work: &WorkingDirectory,
        fresh_models: &[PathBuf],
    ) -> WalkmeshResult<()> {
        if stage != Stage::Undistortion {
            return Ok(());
        }
        let model = work.sparse_model(self.engine.sparse_model);
        if is_populated(&model) && fresh_models.contains(&model) {
            Ok(())
        } else {
            Err(WalkmeshError::MissingExpectedArtifact {
                stage: Stage::Mapping,
                path: model,
            })
        }
    }

    fn run_stage(
        &self,
        stage: Stage,
        work: &WorkingDirectory,
        frames_dir: &Path,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<()> {
        let command = stage_command(stage, &self.engine, work, frames_dir);
        debug!(stage = %stage, command = %command.display(), "launching stage");

        events.on_event(PipelineEvent::StageStarted {
            stage,
            command: command.display(),
        });

        let forward = events.wants_stage_output();
        let start = Instant::now();
        self.runner.run(stage.tool(), &command, &mut |line: &str| {
            if forward {
                events.on_event(PipelineEvent::StageOutput {
                    stage,
                    line: line.to_string(),
                });
            }
        })?;

        events.on_event(PipelineEvent::StageCompleted {
            stage,
            elapsed: start.elapsed(),
        });
        Ok(())
    }

    /// Verify the stage left fresh output; mapping returns the sub-models it
    /// wrote
    fn check_postcondition(
        &self,
        stage: Stage,
        work: &WorkingDirectory,
        outputs: &[PathBuf],
        before: &ArtifactSnapshot,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<Option<Vec<PathBuf>>> {
        if stage != Stage::Mapping {
            for path in outputs {
                require_fresh(stage, path, before)?;
            }
            return Ok(None);
        }

        let fresh: Vec<(u32, PathBuf)> = populated_sub_models(&work.sparse_dir())
            .into_iter()
            .filter(|(_, path)| ArtifactSnapshot::capture(path) != before.within(path))
            .collect();
        if fresh.is_empty() {
            return Err(WalkmeshError::NoSparseModel {
                sparse_dir: work.sparse_dir(),
            });
        }
        if fresh.len() > 1 {
            debug!(count = fresh.len(), "mapper produced several sub-models");
        }
        let chosen = work.sparse_model(self.engine.sparse_model);
        if let Some((index, path)) = fresh.iter().find(|(_, path)| *path == chosen) {
            events.on_event(PipelineEvent::SparseModelSelected {
                summary: SparseModelSummary::read(*index, path),
            });
        }
        Ok(Some(fresh.into_iter().map(|(_, path)| path).collect()))
    }
}

/// Paths a stage is expected to write
fn stage_outputs(stage: Stage, work: &WorkingDirectory) -> Vec<PathBuf> {
    match stage {
        Stage::FeatureExtraction | Stage::ExhaustiveMatching => vec![work.database()],
        Stage::Mapping => vec![work.sparse_dir()],
        Stage::Undistortion => vec![work.undistorted_images(), work.undistorted_sparse()],
        Stage::DenseStereo => vec![work.depth_maps()],
        Stage::Fusion => vec![work.fused_ply()],
        Stage::Meshing => vec![work.mesh_ply()],
    }
}

fn require_fresh(stage: Stage, path: &Path, before: &ArtifactSnapshot) -> WalkmeshResult<()> {
    if is_populated(path) && ArtifactSnapshot::capture(path) != before.within(path) {
        Ok(())
    } else {
        Err(WalkmeshError::MissingExpectedArtifact {
            stage,
            path: path.to_path_buf(),
        })
    }
}

fn absolute(path: &Path) -> WalkmeshResult<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
