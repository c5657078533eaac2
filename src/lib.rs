//! blockmerge: a self-pruning domain blocklist merger
//!
//! This crate fetches many remote domain blocklists, folds them into one minimal
//! cover set (no entry is a subdomain of another), collapses large sibling clusters
//! into their parent domain, and keeps a registry of sources that prunes itself:
//! redundant, mirrored and dead lists are dropped between runs.

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod fetcher;
pub mod output;
pub mod pipeline;
pub mod registry;
pub mod state;
pub mod storage;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for blockmerge operations
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source registry not found: {}", path.display())]
    MissingRegistry { path: PathBuf },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// Domain-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Domain is empty")]
    Empty,

    #[error("Domain '{0}' needs at least two labels")]
    TooFewLabels(String),

    #[error("Domain '{domain}' has an invalid label '{label}'")]
    InvalidLabel { domain: String, label: String },

    #[error("Domain '{0}' ends in a numeric label")]
    NumericTld(String),
}

/// Result type alias for blockmerge operations
pub type Result<T> = std::result::Result<T, MergeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;

// Re-export commonly used types
pub use aggregate::{CoverSet, MirrorIndex, Promotion};
pub use config::Config;
pub use domain::{extract_domain, Domain};
pub use registry::{Registry, Source};
pub use state::{ReliabilityPolicy, SourceOutcome};
