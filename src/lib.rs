//! walkmesh - walkthrough video to mesh and point cloud
//!
//! Samples a walkthrough video into still frames, drives an external
//! structure-from-motion / multi-view-stereo engine (COLMAP) through its six
//! stages, and exports the resulting mesh and dense point cloud into
//! interchange formats.
//!
//! ## Layers
//!
//! - `domain` - value objects, entities and ports
//! - `application` - use cases (sample, reconstruct, export, view)
//! - `infrastructure` - process, video, geometry and event adapters
//! - `presentation` - CLI, wiring and output rendering

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use config::Config;
pub use domain::entities::ReconstructionManifest;
pub use domain::value_objects::{SamplingOptions, Stage, WorkingDirectory};
pub use error::{WalkmeshError, WalkmeshResult};
