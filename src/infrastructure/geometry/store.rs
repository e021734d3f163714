//! File-backed geometry store
//!
//! Dispatches on the (case-insensitive) file extension. Writes go to a
//! temporary file next to the destination and are renamed into place, so a
//! failed write never leaves a truncated artifact behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::entities::{PointCloud, TriangleMesh};
use crate::domain::ports::{GeometryStore, WriteError, WriteOptions};
use crate::error::{WalkmeshError, WalkmeshResult};

use super::{glb, obj, ply, xyz, FormatError};

/// Geometry store over the local file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FileGeometryStore;

impl FileGeometryStore {
    pub fn new() -> Self {
        Self
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}

fn unsupported(path: &Path) -> WalkmeshError {
    WalkmeshError::UnsupportedFormat {
        path: path.to_path_buf(),
    }
}

fn read_error(path: &Path, error: FormatError) -> WalkmeshError {
    match error {
        FormatError::Io(e) => WalkmeshError::Io(e),
        other => WalkmeshError::Geometry {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

fn open(path: &Path) -> WalkmeshResult<BufReader<File>> {
    Ok(BufReader::new(File::open(path)?))
}

/// Write through a sibling temp file, then rename over `path`
fn write_atomically<F>(path: &Path, write: F) -> Result<(), WriteError>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<(), FormatError>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let context = |e: &dyn std::fmt::Display| WriteError(format!("{}: {e}", path.display()));

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| context(&e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer).map_err(|e| context(&e))?;
        writer.flush().map_err(|e| context(&e))?;
    }
    temp.persist(path).map_err(|e| context(&e.error))?;
    debug!(path = %path.display(), "geometry written");
    Ok(())
}

impl GeometryStore for FileGeometryStore {
    fn read_mesh(&self, path: &Path) -> WalkmeshResult<TriangleMesh> {
        match extension(path).as_str() {
            "ply" => ply::read(open(path)?).map_err(|e| read_error(path, e)),
            "obj" => {
                std::fs::metadata(path)?;
                obj::read(path).map_err(|e| read_error(path, e))
            }
            "glb" | "gltf" => {
                std::fs::metadata(path)?;
                glb::read(path).map_err(|e| read_error(path, e))
            }
            _ => Err(unsupported(path)),
        }
    }

    fn read_point_cloud(&self, path: &Path) -> WalkmeshResult<PointCloud> {
        let ext = extension(path);
        if ext == "ply" {
            return ply::read_point_cloud(open(path)?).map_err(|e| read_error(path, e));
        }
        match xyz::Layout::from_extension(&ext) {
            Some(layout) => xyz::read(open(path)?, layout).map_err(|e| read_error(path, e)),
            None => Err(unsupported(path)),
        }
    }

    fn write_mesh(
        &self,
        path: &Path,
        mesh: &TriangleMesh,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        match extension(path).as_str() {
            "ply" => {
                let encoding = ply_encoding(options);
                write_atomically(path, |w| Ok(ply::write_mesh(w, mesh, encoding)?))
            }
            "obj" => write_atomically(path, |w| Ok(obj::write_mesh(w, mesh)?)),
            "glb" => write_atomically(path, |w| glb::write_mesh(w, mesh)),
            _ => Err(WriteError(format!(
                "no mesh writer for {}",
                path.display()
            ))),
        }
    }

    fn write_point_cloud(
        &self,
        path: &Path,
        cloud: &PointCloud,
        options: WriteOptions,
    ) -> Result<(), WriteError> {
        let ext = extension(path);
        if ext == "ply" {
            let encoding = ply_encoding(options);
            return write_atomically(path, |w| Ok(ply::write_point_cloud(w, cloud, encoding)?));
        }
        match xyz::Layout::from_extension(&ext) {
            Some(layout) => write_atomically(path, |w| Ok(xyz::write(w, cloud, layout)?)),
            None => Err(WriteError(format!(
                "no point cloud writer for {}",
                path.display()
            ))),
        }
    }
}

fn ply_encoding(options: WriteOptions) -> ply::Encoding {
    if options.binary {
        ply::Encoding::BinaryLittleEndian
    } else {
        ply::Encoding::Ascii
    }
}
