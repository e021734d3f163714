//! View Use Case
//!
//! Loads one artifact by extension and hands it to a display.

use std::path::Path;

use crate::domain::entities::{Bounds, PointCloud};
use crate::domain::ports::{Geometry, GeometryDisplay, GeometryStore};
use crate::error::{WalkmeshError, WalkmeshResult};

/// What an extension is loaded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Mesh,
    PointCloud,
    /// PLY carries either; decided by whether it has faces
    MeshOrPointCloud,
}

/// Classify `path` by its (case-insensitive) extension
pub fn classify(path: &Path) -> WalkmeshResult<ArtifactKind> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xyz" | "xyzn" | "xyzrgb" => Ok(ArtifactKind::PointCloud),
        "obj" | "gltf" | "glb" => Ok(ArtifactKind::Mesh),
        "ply" => Ok(ArtifactKind::MeshOrPointCloud),
        _ => Err(WalkmeshError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Headline numbers of a loaded artifact
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySummary {
    pub kind: &'static str,
    pub vertices: usize,
    pub triangles: usize,
    pub bounds: Option<Bounds>,
}

impl GeometrySummary {
    pub fn of(geometry: &Geometry) -> Self {
        match geometry {
            Geometry::Mesh(mesh) => Self {
                kind: geometry.kind(),
                vertices: mesh.vertices.len(),
                triangles: mesh.triangles.len(),
                bounds: mesh.bounds(),
            },
            Geometry::PointCloud(cloud) => Self {
                kind: geometry.kind(),
                vertices: cloud.len(),
                triangles: 0,
                bounds: cloud.bounds(),
            },
        }
    }
}

/// View use case
pub struct ViewUseCase<G, D>
where
    G: GeometryStore,
    D: GeometryDisplay,
{
    store: G,
    display: D,
}

impl<G, D> ViewUseCase<G, D>
where
    G: GeometryStore,
    D: GeometryDisplay,
{
    pub fn new(store: G, display: D) -> Self {
        Self { store, display }
    }

    /// Load `path` for display
    ///
    /// Fails with `UnsupportedFormat` before touching the file when the
    /// extension is unknown, and with `EmptyGeometry` when nothing loads.
    /// Geometry is returned as stored; the display opens the file itself
    /// and shades it however it likes.
    pub fn load(&self, path: &Path) -> WalkmeshResult<Geometry> {
        let geometry = match classify(path)? {
            ArtifactKind::PointCloud => Geometry::PointCloud(self.store.read_point_cloud(path)?),
            ArtifactKind::Mesh => Geometry::Mesh(self.store.read_mesh(path)?),
            ArtifactKind::MeshOrPointCloud => {
                let mesh = self.store.read_mesh(path)?;
                if mesh.triangles.is_empty() {
                    Geometry::PointCloud(PointCloud {
                        points: mesh.vertices,
                        normals: mesh.vertex_normals,
                        colors: mesh.vertex_colors,
                    })
                } else {
                    Geometry::Mesh(mesh)
                }
            }
        };

        let empty = match &geometry {
            Geometry::Mesh(mesh) => mesh.is_empty(),
            Geometry::PointCloud(cloud) => cloud.is_empty(),
        };
        if empty {
            return Err(WalkmeshError::EmptyGeometry {
                path: path.to_path_buf(),
            });
        }
        Ok(geometry)
    }

    /// Load `path` and show it
    pub fn view(&self, path: &Path) -> WalkmeshResult<GeometrySummary> {
        self.view_with(path, |_| {})
    }

    /// Like [`view`](Self::view), calling `on_loaded` before the display opens
    pub fn view_with<F>(&self, path: &Path, on_loaded: F) -> WalkmeshResult<GeometrySummary>
    where
        F: FnOnce(&GeometrySummary),
    {
        let geometry = self.load(path)?;
        let summary = GeometrySummary::of(&geometry);
        on_loaded(&summary);
        self.display.show(path, &geometry)?;
        Ok(summary)
    }
}
