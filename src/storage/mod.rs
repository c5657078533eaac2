//! Storage module for persisting run inputs and outputs
//!
//! This module handles all file operations of a run, including:
//! - Reading the source registry and the whitelist
//! - Atomically replacing the registry, blocklist and status files

mod files;
mod traits;

pub use files::{write_atomic, FileStorage};
pub use traits::{Storage, StorageError, StorageResult};

use std::collections::HashSet;

/// Exact-match set of domains that are never blocked
pub type Whitelist = HashSet<String>;

/// Parses whitelist text: one domain per line, `#` comments and blank lines ignored
///
/// Entries are trimmed and lowercased but otherwise taken verbatim; a whitelist
/// entry only ever matches the identical domain.
pub fn parse_whitelist(text: &str) -> Whitelist {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_whitelist() {
        let whitelist = parse_whitelist("# header\n\nGood.Example.com\n  spaced.test  \n");
        assert_eq!(whitelist.len(), 2);
        assert!(whitelist.contains("good.example.com"));
        assert!(whitelist.contains("spaced.test"));
    }

    #[test]
    fn test_parse_whitelist_keeps_subdomains_separate() {
        let whitelist = parse_whitelist("example.com\n");
        assert!(!whitelist.contains("ads.example.com"));
    }
}
