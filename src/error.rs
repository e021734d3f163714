//! Error types for Walkmesh
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::value_objects::Stage;

/// Result type alias for Walkmesh operations
pub type WalkmeshResult<T> = Result<T, WalkmeshError>;

/// Main error type for Walkmesh operations
#[derive(Error, Debug)]
pub enum WalkmeshError {
    /// Input video could not be opened or probed
    #[error("cannot open video {path}: {reason}")]
    UnreadableVideo { path: PathBuf, reason: String },

    /// A sampling option was zero, negative or not a number
    #[error("invalid sampling option {name} = {value}: must be positive")]
    InvalidSamplingOption { name: &'static str, value: String },

    /// Reconstruction was asked to run over a directory without frames
    #[error("no frames found in {dir}")]
    EmptyFrameSet { dir: PathBuf },

    /// External program could not be started at all
    #[error("failed to launch '{command}': {source}")]
    LaunchFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// External stage exited with a non-zero status
    #[error(
        "stage '{stage}' failed (exit code {}): {command}\n--- captured output ---\n{output}",
        exit_code.map(|c| c.to_string()).unwrap_or_else(|| "none, killed by signal".to_string())
    )]
    ExternalStageFailed {
        stage: String,
        command: String,
        exit_code: Option<i32>,
        output: String,
    },

    /// Mapping finished but left no usable sparse model
    #[error(
        "mapper produced no sparse model under {sparse_dir}. \
         The footage could not be registered: try a slower walkthrough with more overlap between frames, \
         better lighting, or less motion blur"
    )]
    NoSparseModel { sparse_dir: PathBuf },

    /// A stage reported success but its expected artifact is absent, empty or
    /// left over from an earlier run
    #[error("stage '{stage}' reported success but expected artifact is missing, empty or unchanged: {path}")]
    MissingExpectedArtifact { stage: Stage, path: PathBuf },

    /// Loaded geometry has no vertices/points
    #[error("geometry in {path} is empty")]
    EmptyGeometry { path: PathBuf },

    /// Geometry writer reported failure
    #[error("failed to write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// File extension is not a supported geometry format
    #[error("unsupported format: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Geometry file could not be parsed
    #[error("invalid geometry in {path}: {message}")]
    Geometry { path: PathBuf, message: String },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Work directory has no persisted manifest
    #[error("no reconstruction manifest at {path} - run 'walkmesh reconstruct' first")]
    ManifestNotFound { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl WalkmeshError {
    /// Whether the failure points at the input footage rather than tooling
    pub fn is_data_quality_problem(&self) -> bool {
        matches!(
            self,
            WalkmeshError::NoSparseModel { .. } | WalkmeshError::EmptyFrameSet { .. }
        )
    }
}
