//! Sparse Model Entity
//!
//! Numbered sub-models written by the mapping stage under `sparse/<n>/`.
//! Each holds `cameras`, `images` and `points3D` in either binary (`.bin`)
//! or text (`.txt`) form.

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::is_populated;

/// Sub-model directories whose name is a number and which have content,
/// sorted by index
pub fn populated_sub_models(sparse_dir: &Path) -> Vec<(u32, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(sparse_dir) else {
        return Vec::new();
    };

    let mut models: Vec<(u32, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && is_populated(path))
        .filter_map(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.parse::<u32>().ok())
                .map(|index| (index, path.clone()))
        })
        .collect();
    models.sort_by_key(|(index, _)| *index);
    models
}

/// Headline numbers of one sparse sub-model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseModelSummary {
    pub index: u32,
    pub path: PathBuf,
    /// Number of registered images, when the images file is readable
    pub registered_images: Option<u64>,
    /// Number of triangulated 3D points, when the points file is readable
    pub points: Option<u64>,
}

impl SparseModelSummary {
    /// Read counts from the model headers
    pub fn read(index: u32, path: &Path) -> Self {
        Self {
            index,
            path: path.to_path_buf(),
            registered_images: count_records(path, "images", 2),
            points: count_records(path, "points3D", 1),
        }
    }
}

/// Record count of `<stem>.bin` (leading little-endian u64) or `<stem>.txt`
/// (non-comment lines divided by `lines_per_record`)
fn count_records(dir: &Path, stem: &str, lines_per_record: u64) -> Option<u64> {
    let bin = dir.join(format!("{stem}.bin"));
    if bin.is_file() {
        let mut header = [0u8; 8];
        let mut file = std::fs::File::open(&bin).ok()?;
        file.read_exact(&mut header).ok()?;
        return Some(u64::from_le_bytes(header));
    }

    let txt = dir.join(format!("{stem}.txt"));
    if txt.is_file() {
        let content = std::fs::read_to_string(&txt).ok()?;
        let lines = content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .count() as u64;
        return Some(lines / lines_per_record);
    }

    None
}
