//! Application Layer
//!
//! Use cases that orchestrate the pipeline.
//! This layer:
//! - Depends on Domain layer (entities, value objects, ports)
//! - Never spawns processes or parses file formats itself
//! - Is driven by the presentation layer with concrete adapters
//!
//! ## Use Cases
//!
//! - `FrameSampler` - Decimate a video into an ordered frame directory
//! - `ReconstructUseCase` - Sequence the external reconstruction stages
//! - `ExportUseCase` - Convert mesh and point cloud into interchange formats
//! - `ViewUseCase` - Load an artifact by extension and display it

pub mod export;
pub mod reconstruct;
pub mod sample;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use export::{ExportPlan, ExportUseCase, ExportedArtifact};
pub use reconstruct::{stage_command, EngineOptions, ReconstructUseCase};
pub use sample::{FrameSampler, SampleResult, DEFAULT_JPEG_QUALITY};
pub use view::{classify, ArtifactKind, GeometrySummary, ViewUseCase};
