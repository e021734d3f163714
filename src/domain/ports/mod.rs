//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod display;
pub mod geometry_store;
pub mod pipeline_events;
pub mod stage_runner;
pub mod video_decoder;

pub use display::{Geometry, GeometryDisplay};
pub use geometry_store::{GeometryStore, WriteError, WriteOptions};
pub use pipeline_events::{NoopEventSink, PipelineEvent, PipelineEventSink};
pub use stage_runner::{ExternalCommand, ProcessOutcome, StageRunner};
pub use video_decoder::{FrameStream, VideoDecoder};
