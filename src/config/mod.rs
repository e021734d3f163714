//! Configuration module for walkmesh
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (WALKMESH_*)
//! 3. Explicit `--config` file, or `./walkmesh.toml`
//! 4. User config (~/.config/walkmesh/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{user_config_path, ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{
    ColorMode, Config, EngineConfig, ExportConfig, OutputConfig, SamplingConfig, Verbosity,
    VideoConfig, ViewerConfig, MESH_EXPORT_FORMATS, POINT_CLOUD_EXPORT_FORMATS,
};
