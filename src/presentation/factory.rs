//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up from the
//! resolved configuration. This is the dependency injection point for the
//! application.

use std::path::Path;

use crate::application::{
    EngineOptions, ExportPlan, ExportUseCase, FrameSampler, ReconstructUseCase, ViewUseCase,
};
use crate::config::{Config, Verbosity};
use crate::domain::ports::PipelineEventSink;
use crate::domain::value_objects::SamplingOptions;
use crate::error::WalkmeshResult;
use crate::infrastructure::{
    ConsoleEventSink, ExternalViewer, FfmpegDecoder, FileGeometryStore, JsonEventSink,
    ProcessStageRunner,
};

/// Type alias for the concrete FrameSampler with all dependencies
pub type ConcreteFrameSampler = FrameSampler<FfmpegDecoder>;

/// Type alias for the concrete ReconstructUseCase with all dependencies
pub type ConcreteReconstructUseCase = ReconstructUseCase<ProcessStageRunner>;

/// Type alias for the concrete ExportUseCase with all dependencies
pub type ConcreteExportUseCase = ExportUseCase<FileGeometryStore>;

/// Type alias for the concrete ViewUseCase with all dependencies
pub type ConcreteViewUseCase = ViewUseCase<FileGeometryStore, ExternalViewer>;

/// Create a frame sampler decoding through the configured ffmpeg/ffprobe
pub fn create_frame_sampler(config: &Config) -> ConcreteFrameSampler {
    let decoder = FfmpegDecoder::new(&config.video.ffmpeg, &config.video.ffprobe);
    FrameSampler::new(decoder).with_jpeg_quality(config.sampling.jpeg_quality)
}

/// Engine options from `[engine]`
pub fn engine_options(config: &Config) -> EngineOptions {
    config.engine.extra_args.iter().fold(
        EngineOptions::new(&config.engine.program).with_sparse_model(config.engine.sparse_model),
        |options, (tool, args)| options.with_extra_args(tool.clone(), args.clone()),
    )
}

/// Create a reconstruct use case running the configured engine as child processes
pub fn create_reconstruct_use_case(config: &Config) -> ConcreteReconstructUseCase {
    ReconstructUseCase::new(ProcessStageRunner::new(), engine_options(config))
}

/// Create an export use case writing to the local file system
pub fn create_export_use_case() -> ConcreteExportUseCase {
    ExportUseCase::new(FileGeometryStore::new())
}

/// Create a view use case opening files in the configured viewer
pub fn create_view_use_case(config: &Config) -> ConcreteViewUseCase {
    ViewUseCase::new(
        FileGeometryStore::new(),
        ExternalViewer::new(&config.viewer.program),
    )
}

/// Export plan from `[export]`, with an optional directory override
pub fn export_plan(config: &Config, dir: Option<&Path>) -> ExportPlan {
    ExportPlan {
        dir: dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.export.dir.clone()),
        basename: config.export.basename.clone(),
        mesh_formats: config.export.mesh_formats.clone(),
        point_cloud_format: config.export.point_cloud_format.clone(),
    }
}

/// Sampling options: flags first, then `[sampling]`
pub fn sampling_options(
    config: &Config,
    fps: Option<f64>,
    max_frames: Option<usize>,
) -> WalkmeshResult<SamplingOptions> {
    SamplingOptions::new(
        Some(fps.unwrap_or(config.sampling.fps)),
        Some(max_frames.unwrap_or(config.sampling.max_frames)),
    )
}

/// Effective verbosity: `-v` flags raise the configured level
pub fn effective_verbosity(config: &Config, verbose: u8) -> Verbosity {
    match verbose {
        0 => config.output.verbosity,
        1 => Verbosity::Verbose,
        _ => Verbosity::Debug,
    }
}

/// Create the progress sink for this invocation
pub fn create_event_sink(json: bool, verbosity: Verbosity) -> Box<dyn PipelineEventSink> {
    if json {
        let sink = JsonEventSink::stdout();
        return if verbosity == Verbosity::Quiet {
            Box::new(sink.without_stage_output())
        } else {
            Box::new(sink)
        };
    }

    Box::new(
        ConsoleEventSink::stdout()
            .with_stream_output(verbosity != Verbosity::Quiet)
            .with_commands(matches!(verbosity, Verbosity::Verbose | Verbosity::Debug)),
    )
}
