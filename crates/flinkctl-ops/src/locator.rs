//! Locating the newest savepoint in a shared directory.

use std::path::Path;

use crate::error::LocateError;
use crate::fs::Filesystem;

/// Return the full path of the most recently modified entry in `dir`.
///
/// A trailing `/` on `dir` is accepted and normalised away. Exact
/// modification-time ties are broken by listing order (the later entry
/// wins), which is non-deterministic when the filesystem's timestamp
/// resolution cannot separate two savepoints.
pub async fn latest_savepoint(fs: &dyn Filesystem, dir: &str) -> Result<String, LocateError> {
    let dir = dir.strip_suffix('/').unwrap_or(dir);

    let entries = fs
        .read_dir(Path::new(dir))
        .await
        .map_err(|source| LocateError::List {
            dir: dir.to_owned(),
            source,
        })?;

    entries
        .into_iter()
        .max_by_key(|entry| entry.modified)
        .map(|newest| format!("{dir}/{}", newest.name))
        .ok_or_else(|| LocateError::Empty {
            dir: dir.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;
    use crate::fs::MemoryFilesystem;

    fn stamp(secs: u64) -> std::time::SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[tokio::test]
    async fn returns_the_newest_entry() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/data/flink", "savepoint-old", stamp(100));
        fs.add_file("/data/flink", "savepoint-new", stamp(300));
        fs.add_file("/data/flink", "savepoint-mid", stamp(200));

        let path = latest_savepoint(&fs, "/data/flink").await.unwrap();
        assert_eq!(path, "/data/flink/savepoint-new");
    }

    #[tokio::test]
    async fn trailing_separator_is_normalised() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/data/flink", "savepoint-a", stamp(100));

        let path = latest_savepoint(&fs, "/data/flink/").await.unwrap();
        assert_eq!(path, "/data/flink/savepoint-a");
    }

    #[tokio::test]
    async fn exact_ties_go_to_the_later_entry() {
        let fs = MemoryFilesystem::new();
        fs.add_file("/data/flink", "savepoint-first", stamp(100));
        fs.add_file("/data/flink", "savepoint-second", stamp(100));

        let path = latest_savepoint(&fs, "/data/flink").await.unwrap();
        assert_eq!(path, "/data/flink/savepoint-second");
    }

    #[tokio::test]
    async fn empty_directory_is_a_distinct_error() {
        let fs = MemoryFilesystem::new();
        fs.add_dir("/data/flink");

        let error = latest_savepoint(&fs, "/data/flink").await.unwrap_err();
        assert!(matches!(error, LocateError::Empty { .. }));
        assert_eq!(
            error.to_string(),
            "No savepoints present in directory: /data/flink"
        );
    }

    #[tokio::test]
    async fn missing_directory_surfaces_the_listing_error() {
        let fs = MemoryFilesystem::new();

        let error = latest_savepoint(&fs, "/data/flink").await.unwrap_err();
        match error {
            LocateError::List { dir, source } => {
                assert_eq!(dir, "/data/flink");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected List error, got {other}"),
        }
    }
}
