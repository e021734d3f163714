//! Domain Value Objects
//!
//! Immutable values with validation and named accessors.

mod sampling;
mod snapshot;
mod stage;
mod work_dir;

pub use sampling::{
    effective_source_fps, frame_file_name, SamplingOptions, FALLBACK_SOURCE_FPS,
    FRAME_INDEX_WIDTH,
};
pub use snapshot::ArtifactSnapshot;
pub use stage::Stage;
pub use work_dir::{is_populated, WorkingDirectory};
