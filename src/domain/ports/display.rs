//! Display Port
//!
//! Hands a loaded artifact to whatever actually draws it.

use std::path::Path;

use crate::domain::entities::{PointCloud, TriangleMesh};
use crate::error::WalkmeshResult;

/// Geometry loaded for display
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Mesh(TriangleMesh),
    PointCloud(PointCloud),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Mesh(_) => "mesh",
            Geometry::PointCloud(_) => "point cloud",
        }
    }
}

/// Shows geometry to the operator
pub trait GeometryDisplay {
    fn show(&self, path: &Path, geometry: &Geometry) -> WalkmeshResult<()>;
}

impl<T: GeometryDisplay + ?Sized> GeometryDisplay for &T {
    fn show(&self, path: &Path, geometry: &Geometry) -> WalkmeshResult<()> {
        (**self).show(path, geometry)
    }
}
