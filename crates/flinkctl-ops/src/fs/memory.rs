//! In-memory filesystem for tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use async_trait::async_trait;

use super::{FileInfo, Filesystem};

/// [`Filesystem`] double holding an in-memory directory tree.
///
/// Directories must be created explicitly (or implicitly by adding a file);
/// reading any other path fails with `NotFound`, mirroring the real
/// filesystem.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    dirs: RwLock<HashMap<PathBuf, Vec<FileInfo>>>,
}

impl MemoryFilesystem {
    /// Create an empty filesystem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty directory.
    pub fn add_dir(&self, dir: impl Into<PathBuf>) {
        self.dirs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(dir.into())
            .or_default();
    }

    /// Add a file with the given modification time, creating its directory
    /// if needed.
    pub fn add_file(&self, dir: impl Into<PathBuf>, name: &str, modified: SystemTime) {
        self.dirs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(dir.into())
            .or_default()
            .push(FileInfo {
                name: name.to_owned(),
                modified,
            });
    }
}

#[async_trait]
impl Filesystem for MemoryFilesystem {
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FileInfo>> {
        let dirs = self.dirs.read().unwrap_or_else(PoisonError::into_inner);

        dirs.get(dir).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            )
        })
    }
}
