//! Export Use Case
//!
//! Converts the reconstruction's mesh and fused point cloud into
//! interchange formats through the geometry store.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::domain::entities::ReconstructionManifest;
use crate::domain::ports::{GeometryStore, PipelineEvent, PipelineEventSink, WriteOptions};
use crate::error::{WalkmeshError, WalkmeshResult};

/// One written export artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Hex SHA-256 of the written file
    pub sha256: String,
}

/// Which files to produce from a manifest
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub dir: PathBuf,
    /// Shared file stem (`room` → `room.obj`, `room_pointcloud.ply`)
    pub basename: String,
    /// Mesh extensions, e.g. `["obj", "glb"]`
    pub mesh_formats: Vec<String>,
    /// Point cloud extension
    pub point_cloud_format: String,
}

impl ExportPlan {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            basename: "room".to_string(),
            mesh_formats: vec!["obj".to_string(), "glb".to_string()],
            point_cloud_format: "ply".to_string(),
        }
    }

    pub fn mesh_destinations(&self) -> Vec<PathBuf> {
        self.mesh_formats
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", self.basename, ext)))
            .collect()
    }

    pub fn point_cloud_destination(&self) -> PathBuf {
        self.dir.join(format!(
            "{}_pointcloud.{}",
            self.basename, self.point_cloud_format
        ))
    }
}

/// Export use case, generic over the geometry store
pub struct ExportUseCase<G>
where
    G: GeometryStore,
{
    store: G,
    options: WriteOptions,
}

impl<G> ExportUseCase<G>
where
    G: GeometryStore,
{
    pub fn new(store: G) -> Self {
        Self {
            store,
            options: WriteOptions::default(),
        }
    }

    /// Export a mesh, computing vertex normals when the source has none
    ///
    /// Nothing is created on disk when the source is empty.
    pub fn export_mesh(
        &self,
        src: &Path,
        dst: &Path,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<ExportedArtifact> {
        let mut mesh = self.store.read_mesh(src)?;
        if mesh.is_empty() {
            return Err(WalkmeshError::EmptyGeometry {
                path: src.to_path_buf(),
            });
        }
        if !mesh.has_vertex_normals() {
            mesh.compute_vertex_normals();
        }

        create_parent(dst)?;
        self.store
            .write_mesh(dst, &mesh, self.options)
            .map_err(|e| WalkmeshError::WriteFailed {
                path: dst.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.finish(src, dst, events)
    }

    /// Export a point cloud
    ///
    /// Nothing is created on disk when the source is empty.
    pub fn export_point_cloud(
        &self,
        src: &Path,
        dst: &Path,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<ExportedArtifact> {
        let cloud = self.store.read_point_cloud(src)?;
        if cloud.is_empty() {
            return Err(WalkmeshError::EmptyGeometry {
                path: src.to_path_buf(),
            });
        }

        create_parent(dst)?;
        self.store
            .write_point_cloud(dst, &cloud, self.options)
            .map_err(|e| WalkmeshError::WriteFailed {
                path: dst.to_path_buf(),
                reason: e.to_string(),
            })?;

        self.finish(src, dst, events)
    }

    /// Export every artifact named by `plan` from a finished reconstruction
    pub fn export_manifest(
        &self,
        manifest: &ReconstructionManifest,
        plan: &ExportPlan,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<Vec<ExportedArtifact>> {
        manifest.validate()?;

        let mut artifacts = Vec::new();
        for dst in plan.mesh_destinations() {
            artifacts.push(self.export_mesh(&manifest.mesh_ply, &dst, events)?);
        }
        artifacts.push(self.export_point_cloud(
            &manifest.dense_fused_ply,
            &plan.point_cloud_destination(),
            events,
        )?);
        Ok(artifacts)
    }

    fn finish(
        &self,
        src: &Path,
        dst: &Path,
        events: &dyn PipelineEventSink,
    ) -> WalkmeshResult<ExportedArtifact> {
        let sha256 = file_sha256(dst)?;
        events.on_event(PipelineEvent::Exported {
            source: src.to_path_buf(),
            destination: dst.to_path_buf(),
            sha256: sha256.clone(),
        });
        Ok(ExportedArtifact {
            source: src.to_path_buf(),
            destination: dst.to_path_buf(),
            sha256,
        })
    }
}

fn create_parent(path: &Path) -> WalkmeshResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn file_sha256(path: &Path) -> WalkmeshResult<String> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
