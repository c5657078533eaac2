//! File-backed storage
//!
//! Every output is written to a temporary file in the target's directory and
//! renamed over the target, so an interrupted run leaves the previous files intact.

use crate::config::PathsConfig;
use crate::domain::Domain;
use crate::output::{format_blocklist, format_status};
use crate::registry::Registry;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{parse_whitelist, Whitelist};
use crate::MergeError;
use chrono::{DateTime, Utc};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Storage backend over the configured plain-text files
#[derive(Debug, Clone)]
pub struct FileStorage {
    paths: PathsConfig,
}

impl FileStorage {
    /// Creates a file storage for the given locations
    pub fn new(paths: PathsConfig) -> Self {
        Self { paths }
    }
}

impl Storage for FileStorage {
    fn load_registry(&self) -> crate::Result<Registry> {
        let path = &self.paths.sources;
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Registry::parse(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(MergeError::MissingRegistry {
                path: path.clone(),
            }),
            Err(e) => Err(StorageError::Io(e).into()),
        }
    }

    fn load_whitelist(&self) -> crate::Result<Whitelist> {
        let path = &self.paths.whitelist;
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(parse_whitelist(&text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No whitelist at {}, nothing is exempt", path.display());
                Ok(Whitelist::new())
            }
            Err(e) => Err(StorageError::Io(e).into()),
        }
    }

    fn save_registry(&mut self, registry: &Registry) -> crate::Result<()> {
        write_atomic(&self.paths.sources, &registry.serialize())?;
        Ok(())
    }

    fn save_blocklist(&mut self, domains: &[Domain]) -> crate::Result<()> {
        write_atomic(&self.paths.blocklist, &format_blocklist(domains))?;
        Ok(())
    }

    fn save_status(&mut self, total: usize, updated_at: DateTime<Utc>) -> crate::Result<()> {
        if let Some(path) = &self.paths.status {
            write_atomic(path, &format_status(total, updated_at))?;
        }
        Ok(())
    }
}

/// Replaces `path` with `content` via a temporary file and a rename
///
/// Missing parent directories are created.
pub fn write_atomic(path: &Path, content: &str) -> StorageResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| StorageError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    tracing::debug!("Wrote {} ({} bytes)", path.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> FileStorage {
        FileStorage::new(PathsConfig {
            sources: dir.path().join("sources.txt"),
            whitelist: dir.path().join("whitelist.txt"),
            blocklist: dir.path().join("out").join("blocklist.txt"),
            status: Some(dir.path().join("version.txt")),
        })
    }

    #[test]
    fn test_missing_registry_is_fatal() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        match storage.load_registry() {
            Err(MergeError::MissingRegistry { path }) => {
                assert_eq!(path, dir.path().join("sources.txt"));
            }
            other => panic!("expected MissingRegistry, got {:?}", other),
        }
    }

    #[test]
    fn test_load_registry() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("sources.txt"),
            "# comment\nhttps://b.test/list\nMASTER|https://a.test/list\n",
        )
        .unwrap();

        let registry = storage_in(&dir).load_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.master_count(), 1);
    }

    #[test]
    fn test_missing_whitelist_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(storage_in(&dir).load_whitelist().unwrap().is_empty());
    }

    #[test]
    fn test_load_whitelist() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("whitelist.txt"),
            "# keep these\n  Ads.Example.com \n\nfoo.test\n",
        )
        .unwrap();

        let whitelist = storage_in(&dir).load_whitelist().unwrap();
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("ads.example.com"));
        assert!(whitelist.contains("foo.test"));
    }

    #[test]
    fn test_save_outputs() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);

        let domains = vec![
            Domain::parse("a.test").unwrap(),
            Domain::parse("b.test").unwrap(),
        ];
        storage.save_blocklist(&domains).unwrap();
        storage
            .save_registry(&Registry::parse("MASTER|https://a.test/list\n"))
            .unwrap();
        storage.save_status(2, Utc::now()).unwrap();

        let blocklist = std::fs::read_to_string(dir.path().join("out/blocklist.txt")).unwrap();
        assert_eq!(
            blocklist,
            "# Optimized Blocklist\n# Total Domains: 2\na.test\nb.test\n"
        );

        let registry = std::fs::read_to_string(dir.path().join("sources.txt")).unwrap();
        assert!(registry.ends_with("MASTER|https://a.test/list\n"));

        let status = std::fs::read_to_string(dir.path().join("version.txt")).unwrap();
        assert!(status.starts_with("Last Update: "));
        assert!(status.ends_with("Total: 2\n"));
    }

    #[test]
    fn test_status_skipped_without_path() {
        let dir = TempDir::new().unwrap();
        let mut storage = storage_in(&dir);
        storage.paths.status = None;

        storage.save_status(5, Utc::now()).unwrap();
        assert!(!dir.path().join("version.txt").exists());
    }

    #[test]
    fn test_write_atomic_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.txt");

        write_atomic(&path, "first\n").unwrap();
        write_atomic(&path, "second\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second\n");
        // No temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_onto_directory_fails() {
        let dir = TempDir::new().unwrap();
        let target: PathBuf = dir.path().join("taken");
        std::fs::create_dir(&target).unwrap();

        let result = write_atomic(&target, "x");
        assert!(matches!(result, Err(StorageError::Persist { .. })));
    }
}
