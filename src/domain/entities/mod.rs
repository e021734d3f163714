//! Domain Entities
//!
//! Artifacts of a reconstruction run. Apart from geometry, these are views
//! over files on disk rather than in-memory state.

mod frame_set;
mod geometry;
mod manifest;
mod sparse_model;

pub use frame_set::FrameSet;
pub use geometry::{Bounds, PointCloud, TriangleMesh};
pub use manifest::ReconstructionManifest;
pub use sparse_model::{populated_sub_models, SparseModelSummary};
