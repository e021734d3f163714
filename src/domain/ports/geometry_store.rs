//! Geometry Store Port
//!
//! Boundary to mesh/point-cloud file I/O. The export adapter and the viewer
//! only see read/write functions over standard 3D file formats.

use std::path::Path;

use crate::domain::entities::{PointCloud, TriangleMesh};
use crate::error::WalkmeshResult;

/// Encoding requested from a writer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Prefer a binary encoding when the format has one
    pub binary: bool,
    /// Prefer the compact variant of the format when it has one
    pub compressed: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            binary: true,
            compressed: true,
        }
    }
}

/// Failure reported by a geometry writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError(pub String);

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for WriteError {}

/// Reads and writes geometry by file extension
pub trait GeometryStore {
    /// Load a triangle mesh
    fn read_mesh(&self, path: &Path) -> WalkmeshResult<TriangleMesh>;

    /// Load a point cloud
    fn read_point_cloud(&self, path: &Path) -> WalkmeshResult<PointCloud>;

    /// Write a mesh; the format follows the destination extension
    fn write_mesh(
        &self,
        path: &Path,
        mesh: &TriangleMesh,
        options: WriteOptions,
    ) -> Result<(), WriteError>;

    /// Write a point cloud; the format follows the destination extension
    fn write_point_cloud(
        &self,
        path: &Path,
        cloud: &PointCloud,
        options: WriteOptions,
    ) -> Result<(), WriteError>;
}

impl<T: GeometryStore + ?Sized> GeometryStore for &T {
    fn read_mesh(&self, path: &Path) -> WalkmeshResult<TriangleMesh> {
        (**self).read_mesh(path)
    }

    fn read_point_cloud(&self, path: &Path) -> WalkmeshResult<PointCloud> {
        (**self).read_point_cloud(path)
    }

    fn write_mesh(
        &self,
        path: &Path,
        mesh: &TriangleMesh,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        (**self).write_mesh(path, mesh, options)
    }

    fn write_point_cloud(
        &self,
        path: &Path,
        cloud: &PointCloud,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        (**self).write_point_cloud(path, cloud, options)
    }
}
