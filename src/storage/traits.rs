//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::domain::Domain;
use crate::registry::Registry;
use crate::storage::Whitelist;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to replace {}: {source}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// The registry and whitelist are read once at the start of a run; the three
/// outputs are written once, after every source has been processed.
pub trait Storage {
    // ===== Inputs =====

    /// Reads the source registry
    ///
    /// # Errors
    ///
    /// `MergeError::MissingRegistry` if there is no registry at all.
    fn load_registry(&self) -> crate::Result<Registry>;

    /// Reads the whitelist; a missing whitelist is empty
    fn load_whitelist(&self) -> crate::Result<Whitelist>;

    // ===== Outputs =====

    /// Replaces the registry with the pruned one
    fn save_registry(&mut self, registry: &Registry) -> crate::Result<()>;

    /// Replaces the merged blocklist
    fn save_blocklist(&mut self, domains: &[Domain]) -> crate::Result<()>;

    /// Replaces the status file, if the backend keeps one
    fn save_status(&mut self, total: usize, updated_at: DateTime<Utc>) -> crate::Result<()>;
}
