//! JSON Event Sink
//!
//! Outputs pipeline events as NDJSON for CI/automation consumption.

use crate::domain::ports::{PipelineEvent, PipelineEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    /// Whether every external tool line becomes an event
    stage_output: bool,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            stage_output: true,
        }
    }

    /// Create a JSON event sink writing to a custom writer (for testing)
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            stage_output: true,
        }
    }

    /// Drop per-line tool output from the stream
    pub fn without_stage_output(mut self) -> Self {
        self.stage_output = false;
        self
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

/// JSON object for one event
pub fn event_json(event: &PipelineEvent) -> serde_json::Value {
    match event {
        PipelineEvent::SamplingStarted {
            video,
            source_fps,
            stride,
        } => serde_json::json!({
            "event": "sampling_start",
            "video": video.display().to_string(),
            "source_fps": source_fps,
            "stride": stride,
        }),

        PipelineEvent::SamplingFinished { output_dir, frames } => serde_json::json!({
            "event": "sampling_complete",
            "output_dir": output_dir.display().to_string(),
            "frames": frames,
        }),

        PipelineEvent::ReconstructionStarted {
            frames_dir,
            work_dir,
            database,
            frame_count,
        } => serde_json::json!({
            "event": "start",
            "command": "reconstruct",
            "frames_dir": frames_dir.display().to_string(),
            "work_dir": work_dir.display().to_string(),
            "database": database.display().to_string(),
            "frame_count": frame_count,
        }),

        PipelineEvent::StaleDatabaseRemoved { path } => serde_json::json!({
            "event": "stale_database_removed",
            "path": path.display().to_string(),
        }),

        PipelineEvent::StageStarted { stage, command } => serde_json::json!({
            "event": "stage_start",
            "stage": stage,
            "step": stage.step(),
            "of": crate::domain::value_objects::Stage::STEP_COUNT,
            "command": command,
        }),

        PipelineEvent::StageOutput { stage, line } => serde_json::json!({
            "event": "stage_output",
            "stage": stage,
            "line": line,
        }),

        PipelineEvent::StageCompleted { stage, elapsed } => serde_json::json!({
            "event": "stage_complete",
            "stage": stage,
            "elapsed_ms": elapsed.as_millis() as u64,
        }),

        PipelineEvent::SparseModelSelected { summary } => serde_json::json!({
            "event": "sparse_model",
            "index": summary.index,
            "path": summary.path.display().to_string(),
            "registered_images": summary.registered_images,
            "points": summary.points,
        }),

        PipelineEvent::ReconstructionCompleted {
            fused_ply,
            mesh_ply,
        } => serde_json::json!({
            "event": "complete",
            "command": "reconstruct",
            "status": "success",
            "dense_fused_ply": fused_ply.display().to_string(),
            "mesh_ply": mesh_ply.display().to_string(),
        }),

        PipelineEvent::Exported {
            source,
            destination,
            sha256,
        } => serde_json::json!({
            "event": "exported",
            "source": source.display().to_string(),
            "destination": destination.display().to_string(),
            "sha256": sha256,
        }),
    }
}

impl PipelineEventSink for JsonEventSink {
    fn on_event(&self, event: PipelineEvent) {
        self.write_event(event_json(&event));
    }

    fn wants_stage_output(&self) -> bool {
        self.stage_output
    }
}
