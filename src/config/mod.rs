//! Configuration module for blockmerge
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section and key is optional; [`Config::default`] is the built-in setup
//! used when no file is given.
//!
//! # Example
//!
//! ```no_run
//! use blockmerge::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("blockmerge.toml")).unwrap();
//! println!("Sources are dropped after {} failures", config.merge.max_fails);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FetchConfig, MergeConfig, PathsConfig, SuffixConfig, DEFAULT_PROTECTED_KEYWORDS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
