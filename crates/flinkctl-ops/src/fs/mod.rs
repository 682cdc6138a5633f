//! Filesystem access for the savepoint directory.
//!
//! Savepoints live on a filesystem shared between the cluster and the
//! deployer. Access goes through the [`Filesystem`] trait so the locator can
//! be exercised against an in-memory tree in tests.

mod memory;
mod os;

pub use memory::MemoryFilesystem;
pub use os::OsFilesystem;

use std::io;
use std::path::Path;
use std::time::SystemTime;

use async_trait::async_trait;

/// A directory entry with its modification time.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Entry name within its directory.
    pub name: String,
    /// Last modification time.
    pub modified: SystemTime,
}

/// Read access to the savepoint filesystem.
#[async_trait]
pub trait Filesystem: Send + Sync {
    /// List the entries of a directory with their modification times.
    ///
    /// The error for a missing or unreadable directory is surfaced as-is.
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FileInfo>>;
}
