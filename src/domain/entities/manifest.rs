//! Reconstruction Manifest Entity
//!
//! The only contract between the orchestrator and downstream consumers
//! (export, viewer).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{is_populated, Stage};
use crate::error::{WalkmeshError, WalkmeshResult};

/// Named output paths of one finished reconstruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionManifest {
    pub work_dir: PathBuf,
    pub frames_dir: PathBuf,
    pub sparse_model: PathBuf,
    pub dense_fused_ply: PathBuf,
    pub mesh_ply: PathBuf,
    /// When the run started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the last stage finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ReconstructionManifest {
    /// Logical name → path pairs, in pipeline order
    pub fn entries(&self) -> [(&'static str, &Path); 5] {
        [
            ("work_dir", self.work_dir.as_path()),
            ("frames_dir", self.frames_dir.as_path()),
            ("sparse_model", self.sparse_model.as_path()),
            ("dense_fused_ply", self.dense_fused_ply.as_path()),
            ("mesh_ply", self.mesh_ply.as_path()),
        ]
    }

    /// Check every path exists and is non-empty
    ///
    /// The stage reported for a missing artifact is the one that produces it.
    pub fn validate(&self) -> WalkmeshResult<()> {
        let producers = [
            (Stage::FeatureExtraction, &self.frames_dir),
            (Stage::Mapping, &self.sparse_model),
            (Stage::Fusion, &self.dense_fused_ply),
            (Stage::Meshing, &self.mesh_ply),
        ];
        for (stage, path) in producers {
            if !is_populated(path) {
                return Err(WalkmeshError::MissingExpectedArtifact {
                    stage,
                    path: path.clone(),
                });
            }
        }
        if !self.work_dir.is_dir() {
            return Err(WalkmeshError::MissingExpectedArtifact {
                stage: Stage::FeatureExtraction,
                path: self.work_dir.clone(),
            });
        }
        Ok(())
    }

    /// Write the manifest as pretty JSON
    pub fn save(&self, path: &Path) -> WalkmeshResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a persisted manifest
    pub fn load(path: &Path) -> WalkmeshResult<Self> {
        if !path.exists() {
            return Err(WalkmeshError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
