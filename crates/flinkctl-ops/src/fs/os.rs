//! Real filesystem access.

use std::io;
use std::path::Path;

use async_trait::async_trait;

use super::{FileInfo, Filesystem};

/// [`Filesystem`] backed by the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

#[async_trait]
impl Filesystem for OsFilesystem {
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<FileInfo>> {
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(dir).await?;

        while let Some(entry) = reader.next_entry().await? {
            let metadata = entry.metadata().await?;
            entries.push(FileInfo {
                name: entry.file_name().to_string_lossy().into_owned(),
                modified: metadata.modified()?,
            });
        }

        Ok(entries)
    }
}
