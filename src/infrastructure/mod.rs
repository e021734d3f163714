//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `process/` - Child process runner for reconstruction stages
//! - `video/` - ffprobe/ffmpeg frame decoder
//! - `geometry/` - Mesh and point cloud file formats
//! - `events/` - Console and JSON progress sinks
//! - `viewer` - External viewer program

pub mod events;
pub mod geometry;
pub mod process;
pub mod video;
pub mod viewer;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use geometry::FileGeometryStore;
pub use process::ProcessStageRunner;
pub use video::FfmpegDecoder;
pub use viewer::ExternalViewer;
