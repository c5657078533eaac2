//! Source registry
//!
//! The registry is the ordered list of remote sources that persists between runs.
//! It is parsed from the directive file at the start of a run and written back in
//! full at the end, with sources dropped or updated by the reliability state machine.
//!
//! # Example
//!
//! ```
//! use blockmerge::Registry;
//!
//! let registry = Registry::parse(
//!     "# sources\nhttps://b.test/list\nMASTER|https://z.test/list\nFAILx1|https://a.test/list\n",
//! );
//! let urls: Vec<&str> = registry.iter().map(|s| s.url.as_str()).collect();
//! assert_eq!(urls, vec!["https://z.test/list", "https://a.test/list", "https://b.test/list"]);
//! ```

mod source;

pub use source::{parse_directive, source_key, Source, FAIL_PREFIX, MASTER_PREFIX};

use std::collections::HashMap;

/// Header line written at the top of every rewritten registry file
pub const REGISTRY_HEADER: &str = "# blockmerge sources (rewritten after every run)";

/// Ordered collection of sources: masters first, then alphabetical by key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    sources: Vec<Source>,
}

impl Registry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from sources, deduplicating and sorting them
    ///
    /// When the same key occurs more than once the master occurrence wins; among
    /// equally flagged occurrences the first one wins.
    pub fn from_sources(sources: impl IntoIterator<Item = Source>) -> Self {
        let mut by_key: HashMap<String, usize> = HashMap::new();
        let mut unique: Vec<Source> = Vec::new();

        for source in sources {
            match by_key.get(&source.key) {
                Some(&idx) => {
                    if source.is_master && !unique[idx].is_master {
                        tracing::debug!("Duplicate source {} replaced by master entry", source.key);
                        unique[idx] = source;
                    } else {
                        tracing::debug!("Ignoring duplicate source {}", source.key);
                    }
                }
                None => {
                    by_key.insert(source.key.clone(), unique.len());
                    unique.push(source);
                }
            }
        }

        unique.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Self { sources: unique }
    }

    /// Parses a registry from directive file text
    pub fn parse(text: &str) -> Self {
        Self::from_sources(text.lines().filter_map(parse_directive))
    }

    /// Serializes the registry back to directive file text
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(REGISTRY_HEADER.len() + self.sources.len() * 64);
        out.push_str(REGISTRY_HEADER);
        out.push('\n');
        for source in &self.sources {
            out.push_str(&source.directive());
            out.push('\n');
        }
        out
    }

    /// Iterates over the sources in fetch order
    pub fn iter(&self) -> std::slice::Iter<'_, Source> {
        self.sources.iter()
    }

    /// Returns the number of sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if the registry has no sources
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Looks up a source by URL (compared by key)
    pub fn get(&self, url: &str) -> Option<&Source> {
        let key = source_key(url);
        self.sources.iter().find(|s| s.key == key)
    }

    /// Returns the number of master sources
    pub fn master_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_master).count()
    }
}

impl IntoIterator for Registry {
    type Item = Source;
    type IntoIter = std::vec::IntoIter<Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.into_iter()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Source;
    type IntoIter = std::slice::Iter<'a, Source>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.iter()
    }
}

impl FromIterator<Source> for Registry {
    fn from_iter<T: IntoIterator<Item = Source>>(iter: T) -> Self {
        Self::from_sources(iter)
    }
}
