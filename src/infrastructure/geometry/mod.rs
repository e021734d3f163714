//! Geometry file formats
//!
//! Readers and writers for the interchange formats the pipeline produces and
//! consumes, plus `FileGeometryStore`, which dispatches on extension.
//!
//! - `ply` - ascii and binary PLY, meshes and point clouds
//! - `obj` - Wavefront OBJ (reading through `tobj`)
//! - `glb` - binary glTF (reading through `gltf`)
//! - `xyz` - whitespace-separated point lists

pub mod glb;
pub mod obj;
pub mod ply;
mod store;
pub mod xyz;

pub use store::FileGeometryStore;

use thiserror::Error;

/// Failure while decoding or encoding a geometry file
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Unsupported(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;

pub(crate) fn parse_error(message: impl Into<String>) -> FormatError {
    FormatError::Parse(message.into())
}
