//! Frame Set Entity
//!
//! The ordered still images a reconstruction runs over.

use std::path::{Path, PathBuf};

use crate::error::{WalkmeshError, WalkmeshResult};

/// Image extensions accepted as frames
const FRAME_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Ordered sequence of frame images in one directory
///
/// Lexical order of file names equals temporal order because frames carry a
/// fixed-width zero-padded index.
#[derive(Debug, Clone)]
pub struct FrameSet {
    dir: PathBuf,
    frames: Vec<PathBuf>,
}

impl FrameSet {
    /// Scan `dir` for frame images
    ///
    /// Fails with `EmptyFrameSet` when the directory is missing or holds no
    /// images.
    pub fn scan(dir: &Path) -> WalkmeshResult<Self> {
        if !dir.is_dir() {
            return Err(WalkmeshError::EmptyFrameSet {
                dir: dir.to_path_buf(),
            });
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_frame_image(path))
            .collect();

        if frames.is_empty() {
            return Err(WalkmeshError::EmptyFrameSet {
                dir: dir.to_path_buf(),
            });
        }

        frames.sort();
        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames(&self) -> &[PathBuf] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn is_frame_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FRAME_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}
