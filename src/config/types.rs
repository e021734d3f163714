//! Configuration type definitions

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::WalkmeshResult;

use super::loader::{self, ConfigWarning};

/// Frame sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_fps")]
    pub fps: f64,

    #[serde(default = "default_max_frames")]
    pub max_frames: usize,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

fn default_fps() -> f64 {
    2.0
}

fn default_max_frames() -> usize {
    800
}

fn default_jpeg_quality() -> u8 {
    95
}

/// Reconstruction engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Engine executable (name on PATH or absolute path)
    #[serde(default = "default_engine_program")]
    pub program: String,

    /// Sparse sub-model fed to the dense stages
    #[serde(default)]
    pub sparse_model: u32,

    /// Extra arguments per engine tool, e.g. `feature_extractor = ["--SiftExtraction.use_gpu", "0"]`
    #[serde(default)]
    pub extra_args: HashMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: default_engine_program(),
            sparse_model: 0,
            extra_args: HashMap::new(),
        }
    }
}

fn default_engine_program() -> String {
    "colmap".to_string()
}

/// Video tooling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

/// Mesh extensions the geometry store can write
pub const MESH_EXPORT_FORMATS: [&str; 3] = ["ply", "obj", "glb"];

/// Point cloud extensions the geometry store can write
pub const POINT_CLOUD_EXPORT_FORMATS: [&str; 4] = ["ply", "xyz", "xyzn", "xyzrgb"];

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,

    /// File stem shared by all exported artifacts
    #[serde(default = "default_basename")]
    pub basename: String,

    #[serde(default = "default_mesh_formats")]
    pub mesh_formats: Vec<String>,

    #[serde(default = "default_point_cloud_format")]
    pub point_cloud_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
            basename: default_basename(),
            mesh_formats: default_mesh_formats(),
            point_cloud_format: default_point_cloud_format(),
        }
    }
}

impl ExportConfig {
    /// Reject formats no writer exists for, so a bad value fails before a
    /// reconstruction starts rather than at export time
    pub fn check_formats(&self) -> Result<(), String> {
        for format in &self.mesh_formats {
            if !is_one_of(format, &MESH_EXPORT_FORMATS) {
                return Err(format!(
                    "export.mesh_formats: unsupported format '{format}' (expected one of: {})",
                    MESH_EXPORT_FORMATS.join(", ")
                ));
            }
        }
        if !is_one_of(&self.point_cloud_format, &POINT_CLOUD_EXPORT_FORMATS) {
            return Err(format!(
                "export.point_cloud_format: unsupported format '{}' (expected one of: {})",
                self.point_cloud_format,
                POINT_CLOUD_EXPORT_FORMATS.join(", ")
            ));
        }
        Ok(())
    }
}

fn is_one_of(format: &str, supported: &[&str]) -> bool {
    supported.iter().any(|s| s.eq_ignore_ascii_case(format))
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_basename() -> String {
    "room".to_string()
}

fn default_mesh_formats() -> Vec<String> {
    vec!["obj".to_string(), "glb".to_string()]
}

fn default_point_cloud_format() -> String {
    "ply".to_string()
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_viewer_program")]
    pub program: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            program: default_viewer_program(),
        }
    }
}

fn default_viewer_program() -> String {
    "f3d".to_string()
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    #[serde(default)]
    pub verbosity: Verbosity,

    #[serde(default)]
    pub color: ColorMode,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub sampling: SamplingConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub video: VideoConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> WalkmeshResult<Self> {
        let (config, _warnings) = loader::load_with_warnings(path)?;
        Ok(config)
    }

    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> WalkmeshResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Resolve the configuration for a working directory
    ///
    /// An explicit file must load; otherwise `./walkmesh.toml`, then the user
    /// config, then defaults. Environment overrides apply last.
    pub fn resolve(explicit: Option<&Path>) -> WalkmeshResult<(Self, Vec<ConfigWarning>)> {
        loader::resolve(explicit)
    }

    /// Apply environment variable overrides (WALKMESH_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }

    /// Extra arguments configured for an engine tool
    pub fn extra_args_for(&self, tool: &str) -> &[String] {
        self.engine
            .extra_args
            .get(tool)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
