//! Pipeline Event Port
//!
//! Observable progress of sampling, reconstruction and export.
//! Enables live console output, NDJSON streams for CI, and test recording.

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::entities::SparseModelSummary;
use crate::domain::value_objects::Stage;

/// Event emitted while the pipeline runs
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// Frame sampling started
    SamplingStarted {
        video: PathBuf,
        source_fps: f64,
        stride: usize,
    },

    /// Frame sampling finished
    SamplingFinished { output_dir: PathBuf, frames: usize },

    /// Reconstruction started
    ReconstructionStarted {
        frames_dir: PathBuf,
        work_dir: PathBuf,
        database: PathBuf,
        frame_count: usize,
    },

    /// A stale feature database (or sidecar) was deleted
    StaleDatabaseRemoved { path: PathBuf },

    /// Stage process about to launch
    StageStarted { stage: Stage, command: String },

    /// One line of the stage's combined output
    StageOutput { stage: Stage, line: String },

    /// Stage exited successfully and its postcondition held
    StageCompleted { stage: Stage, elapsed: Duration },

    /// Sparse model chosen for the dense stages
    SparseModelSelected { summary: SparseModelSummary },

    /// Reconstruction finished; all artifacts validated
    ReconstructionCompleted { fused_ply: PathBuf, mesh_ply: PathBuf },

    /// One exported artifact written
    Exported {
        source: PathBuf,
        destination: PathBuf,
        sha256: String,
    },
}

/// Trait for receiving pipeline events
///
/// Implementations:
/// - `ConsoleEventSink`: live progress in the terminal
/// - `JsonEventSink`: NDJSON event stream for CI
/// - `NoopEventSink`: silent operation
pub trait PipelineEventSink: Send + Sync {
    /// Handle a pipeline event
    fn on_event(&self, event: PipelineEvent);

    /// Whether this sink wants every line of external tool output
    fn wants_stage_output(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl PipelineEventSink for NoopEventSink {
    fn on_event(&self, _event: PipelineEvent) {}

    fn wants_stage_output(&self) -> bool {
        false
    }
}
