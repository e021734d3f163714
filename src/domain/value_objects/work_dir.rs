//! Working Directory Value Object
//!
//! Named accessors for every artifact location of one reconstruction run:
//!
//! ```text
//! <root>/
//!   frames/
//!   database.db
//!   sparse/<n>/
//!   dense/{images,sparse,stereo/depth_maps}
//!   dense/fused.ply
//!   dense/mesh_poisson.ply
//!   manifest.json
//! ```
//!
//! One run owns its working directory exclusively. Two reconstructions must
//! never share a root; use a fresh directory per run instead.

use std::path::{Path, PathBuf};

/// Root of one reconstruction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectory {
    root: PathBuf,
}

impl WorkingDirectory {
    /// SQLite sidecar suffixes that belong to the feature database
    const DATABASE_SIDECARS: [&'static str; 3] = ["-wal", "-shm", "-journal"];

    /// Create a working directory value for `root`
    ///
    /// Relative roots are resolved against the current directory so that every
    /// accessor returns an absolute path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&root))
                .unwrap_or(root)
        };
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default location for sampled frames
    pub fn frames_dir(&self) -> PathBuf {
        self.root.join("frames")
    }

    /// Feature/match database
    pub fn database(&self) -> PathBuf {
        self.root.join("database.db")
    }

    /// Database file plus its SQLite sidecars
    pub fn database_files(&self) -> Vec<PathBuf> {
        let db = self.database();
        let mut files = vec![db.clone()];
        for suffix in Self::DATABASE_SIDECARS {
            let mut name = db.as_os_str().to_os_string();
            name.push(suffix);
            files.push(PathBuf::from(name));
        }
        files
    }

    pub fn sparse_dir(&self) -> PathBuf {
        self.root.join("sparse")
    }

    /// Numbered sparse sub-model directory
    pub fn sparse_model(&self, index: u32) -> PathBuf {
        self.sparse_dir().join(index.to_string())
    }

    pub fn dense_dir(&self) -> PathBuf {
        self.root.join("dense")
    }

    /// Undistorted images written by the undistortion stage
    pub fn undistorted_images(&self) -> PathBuf {
        self.dense_dir().join("images")
    }

    /// Camera parameters written by the undistortion stage
    pub fn undistorted_sparse(&self) -> PathBuf {
        self.dense_dir().join("sparse")
    }

    /// Per-image depth maps written by dense stereo
    pub fn depth_maps(&self) -> PathBuf {
        self.dense_dir().join("stereo").join("depth_maps")
    }

    pub fn fused_ply(&self) -> PathBuf {
        self.dense_dir().join("fused.ply")
    }

    pub fn mesh_ply(&self) -> PathBuf {
        self.dense_dir().join("mesh_poisson.ply")
    }

    /// Persisted reconstruction manifest
    pub fn manifest_file(&self) -> PathBuf {
        self.root.join("manifest.json")
    }

    /// Create the root, `sparse/` and `dense/` directories
    pub fn prepare(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::create_dir_all(self.sparse_dir())?;
        std::fs::create_dir_all(self.dense_dir())?;
        Ok(())
    }
}

/// True when `path` is a non-empty file or a directory with at least one entry
pub fn is_populated(path: &Path) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => meta.len() > 0,
        Ok(meta) if meta.is_dir() => std::fs::read_dir(path)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false),
        _ => false,
    }
}
