//! Console Event Sink
//!
//! Human-readable progress. External tool output is streamed indented under
//! the stage that produced it, as it arrives.

use crate::domain::ports::{PipelineEvent, PipelineEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that prints progress lines
pub struct ConsoleEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    stream_output: bool,
    show_commands: bool,
}

impl ConsoleEventSink {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            stream_output: true,
            show_commands: false,
        }
    }

    /// Hide external tool output (quiet mode)
    pub fn with_stream_output(mut self, stream: bool) -> Self {
        self.stream_output = stream;
        self
    }

    /// Print the full command line when a stage starts
    pub fn with_commands(mut self, show: bool) -> Self {
        self.show_commands = show;
        self
    }

    fn render(&self, event: &PipelineEvent) -> Option<String> {
        match event {
            PipelineEvent::StageStarted { command, .. } if self.show_commands => {
                render_event(event).map(|head| format!("{head}\n    $ {command}"))
            }
            _ => render_event(event),
        }
    }
}

/// Text for one event; `None` for events that print nothing
pub fn render_event(event: &PipelineEvent) -> Option<String> {
    let text = match event {
        PipelineEvent::SamplingStarted {
            video,
            source_fps,
            stride,
        } => format!(
            "Sampling {} ({:.2} fps source, keeping 1 of every {} frames)",
            video.display(),
            source_fps,
            stride
        ),
        PipelineEvent::SamplingFinished { output_dir, frames } => {
            format!("Wrote {} frames to {}", frames, output_dir.display())
        }
        PipelineEvent::ReconstructionStarted {
            frames_dir,
            work_dir,
            frame_count,
            ..
        } => format!(
            "Reconstructing {} frames from {} in {}",
            frame_count,
            frames_dir.display(),
            work_dir.display()
        ),
        PipelineEvent::StaleDatabaseRemoved { path } => {
            format!("Removed stale database {}", path.display())
        }
        PipelineEvent::StageStarted { stage, .. } => {
            format!("{} ({})", stage.label(), stage.description())
        }
        PipelineEvent::StageOutput { line, .. } => format!("    {line}"),
        PipelineEvent::StageCompleted { stage, elapsed } => {
            format!("{} done in {:.1}s", stage.label(), elapsed.as_secs_f64())
        }
        PipelineEvent::SparseModelSelected { summary } => {
            let count = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_else(|| "?".into());
            format!(
                "Sparse model {}: {} images registered, {} points",
                summary.index,
                count(summary.registered_images),
                count(summary.points)
            )
        }
        PipelineEvent::ReconstructionCompleted { .. } => return None,
        PipelineEvent::Exported { destination, .. } => {
            format!("Exported {}", destination.display())
        }
    };
    Some(text)
}

impl PipelineEventSink for ConsoleEventSink {
    fn on_event(&self, event: PipelineEvent) {
        if let PipelineEvent::StageOutput { .. } = event {
            if !self.stream_output {
                return;
            }
        }
        if let Some(text) = self.render(&event) {
            if let Ok(mut writer) = self.writer.lock() {
                let _ = writeln!(writer, "{text}");
                let _ = writer.flush();
            }
        }
    }

    fn wants_stage_output(&self) -> bool {
        self.stream_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::SparseModelSummary;
    use crate::domain::value_objects::Stage;
    use insta::assert_snapshot;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn renders_stage_progress() {
        let started = PipelineEvent::StageStarted {
            stage: Stage::Fusion,
            command: "colmap stereo_fusion".to_string(),
        };
        assert_snapshot!(render_event(&started).unwrap(), @"[6/6] stereo_fusion (fused point cloud)");

        let done = PipelineEvent::StageCompleted {
            stage: Stage::ExhaustiveMatching,
            elapsed: Duration::from_millis(83_240),
        };
        assert_snapshot!(render_event(&done).unwrap(), @"[2/6] exhaustive_matcher done in 83.2s");
    }

    #[test]
    fn renders_sparse_summary_with_unknown_counts() {
        let event = PipelineEvent::SparseModelSelected {
            summary: SparseModelSummary {
                index: 0,
                path: PathBuf::from("/w/sparse/0"),
                registered_images: Some(118),
                points: None,
            },
        };
        assert_snapshot!(render_event(&event).unwrap(), @"Sparse model 0: 118 images registered, ? points");
    }

    #[test]
    fn quiet_sink_drops_tool_output() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::with_writer(buffer.clone()).with_stream_output(false);

        sink.on_event(PipelineEvent::StageOutput {
            stage: Stage::Mapping,
            line: "Registering image #7 (7)".to_string(),
        });
        sink.on_event(PipelineEvent::StaleDatabaseRemoved {
            path: PathBuf::from("work/database.db"),
        });

        assert!(!sink.wants_stage_output());
        assert_eq!(buffer.text(), "Removed stale database work/database.db\n");
    }

    #[test]
    fn verbose_sink_shows_command_lines() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleEventSink::with_writer(buffer.clone()).with_commands(true);

        sink.on_event(PipelineEvent::StageStarted {
            stage: Stage::FeatureExtraction,
            command: "colmap feature_extractor --database_path db".to_string(),
        });
        sink.on_event(PipelineEvent::StageOutput {
            stage: Stage::FeatureExtraction,
            line: "Processed file [1/3]".to_string(),
        });

        assert_eq!(
            buffer.text(),
            "[1/6] feature_extractor (extract features)\n    \
             $ colmap feature_extractor --database_path db\n    \
             Processed file [1/3]\n"
        );
    }
}
