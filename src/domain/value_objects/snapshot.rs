//! Artifact Snapshot Value Object
//!
//! Size and modification time of every file under a set of paths, taken
//! before a stage launches. Comparing against a later snapshot tells
//! whether the stage wrote anything, so leftovers from an earlier run in
//! the same working directory never pass for fresh output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    len: u64,
    modified: Option<SystemTime>,
}

/// Recorded state of the files below one or more paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSnapshot {
    files: BTreeMap<PathBuf, FileStamp>,
}

impl ArtifactSnapshot {
    /// Record `path`; a missing path yields an empty snapshot
    pub fn capture(path: &Path) -> Self {
        let mut snapshot = Self::default();
        snapshot.record(path);
        snapshot
    }

    pub fn capture_all<P: AsRef<Path>>(paths: &[P]) -> Self {
        let mut snapshot = Self::default();
        for path in paths {
            snapshot.record(path.as_ref());
        }
        snapshot
    }

    /// Entries at or below `prefix`
    pub fn within(&self, prefix: &Path) -> Self {
        Self {
            files: self
                .files
                .iter()
                .filter(|(path, _)| path.starts_with(prefix))
                .map(|(path, stamp)| (path.clone(), *stamp))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    fn record(&mut self, path: &Path) {
        let Ok(meta) = std::fs::metadata(path) else {
            return;
        };
        if meta.is_dir() {
            let Ok(entries) = std::fs::read_dir(path) else {
                return;
            };
            for entry in entries.flatten() {
                self.record(&entry.path());
            }
        } else {
            self.files.insert(
                path.to_path_buf(),
                FileStamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn missing_path_is_empty() {
        let dir = tempdir().unwrap();
        assert!(ArtifactSnapshot::capture(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn walks_directories_recursively() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sparse/0")).unwrap();
        fs::create_dir_all(dir.path().join("sparse/1")).unwrap();
        fs::write(dir.path().join("sparse/0/cameras.bin"), b"a").unwrap();
        fs::write(dir.path().join("sparse/0/images.bin"), b"b").unwrap();
        fs::write(dir.path().join("sparse/1/cameras.bin"), b"c").unwrap();

        let snapshot = ArtifactSnapshot::capture(&dir.path().join("sparse"));
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.within(&dir.path().join("sparse/0")).len(), 2);
        assert!(snapshot.within(&dir.path().join("sparse/2")).is_empty());
    }

    #[test]
    fn untouched_files_compare_equal() {
        let dir = tempdir().unwrap();
        let ply = dir.path().join("fused.ply");
        fs::write(&ply, b"ply\n").unwrap();

        assert_eq!(ArtifactSnapshot::capture(&ply), ArtifactSnapshot::capture(&ply));
    }

    #[test]
    fn rewritten_or_added_files_compare_different() {
        let dir = tempdir().unwrap();
        let ply = dir.path().join("fused.ply");
        fs::write(&ply, b"ply\n").unwrap();
        let before = ArtifactSnapshot::capture_all(&[dir.path()]);

        fs::write(&ply, b"ply\nformat binary_little_endian 1.0\n").unwrap();
        assert_ne!(ArtifactSnapshot::capture_all(&[dir.path()]), before);

        let before = ArtifactSnapshot::capture_all(&[dir.path()]);
        fs::write(dir.path().join("mesh_poisson.ply"), b"ply\n").unwrap();
        assert_ne!(ArtifactSnapshot::capture_all(&[dir.path()]), before);
    }

    #[test]
    fn touched_file_compares_different() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("database.db");
        fs::write(&db, b"db").unwrap();
        let before = ArtifactSnapshot::capture(&db);

        let file = fs::File::options().write(true).open(&db).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();
        drop(file);

        assert_ne!(ArtifactSnapshot::capture(&db), before);
    }
}
