use crate::domain::{SuffixPolicy, SuffixTable, TwoLabelRule};
use crate::state::ReliabilityPolicy;
use crate::ConfigResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Keywords that protect well-known list maintainers from automatic removal
pub const DEFAULT_PROTECTED_KEYWORDS: [&str; 5] =
    ["oisd", "hagezi", "stevenblack", "firebog", "adaway"];

/// Main configuration structure for blockmerge
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub merge: MergeConfig,
    pub fetch: FetchConfig,
    pub suffix: SuffixConfig,
}

impl Config {
    /// Builds the reliability policy for this run
    pub fn reliability_policy(&self) -> ReliabilityPolicy {
        ReliabilityPolicy {
            max_fails: self.merge.max_fails,
            empty_counts_as_failure: self.merge.empty_counts_as_failure,
        }
    }

    /// Builds the suffix boundary policy
    ///
    /// Without any configured suffixes the two-label rule applies; otherwise a
    /// table is built from the list file (if any) and the inline suffixes.
    pub fn suffix_policy(&self) -> ConfigResult<Arc<dyn SuffixPolicy>> {
        if self.suffix.public_suffixes.is_empty() && self.suffix.list_path.is_none() {
            return Ok(Arc::new(TwoLabelRule));
        }

        let mut table = match &self.suffix.list_path {
            Some(path) => SuffixTable::load(path)?,
            None => SuffixTable::new(),
        };
        for suffix in &self.suffix.public_suffixes {
            table.insert_rule(suffix)?;
        }

        tracing::debug!("Loaded public suffix table with {} rules", table.len());
        Ok(Arc::new(table))
    }
}

/// File locations
///
/// Without a `[paths]` section the status file is `version.txt`. A `[paths]`
/// section that leaves out `status` disables the status file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PathsConfig {
    /// Source registry, read at start and rewritten at the end of a run
    #[serde(default = "default_sources")]
    pub sources: PathBuf,

    /// Exact-match whitelist
    #[serde(default = "default_whitelist")]
    pub whitelist: PathBuf,

    /// Merged blocklist output
    #[serde(default = "default_blocklist")]
    pub blocklist: PathBuf,

    /// Optional status file with timestamp and total
    #[serde(default)]
    pub status: Option<PathBuf>,
}

fn default_sources() -> PathBuf {
    PathBuf::from("sources.txt")
}

fn default_whitelist() -> PathBuf {
    PathBuf::from("whitelist.txt")
}

fn default_blocklist() -> PathBuf {
    PathBuf::from("blocklist.txt")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            whitelist: default_whitelist(),
            blocklist: default_blocklist(),
            status: Some(PathBuf::from("version.txt")),
        }
    }
}

/// Merge behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MergeConfig {
    /// Consecutive failures after which an ordinary source is dropped
    pub max_fails: u32,

    /// Members per registrable domain that trigger wildcard promotion
    pub wildcard_threshold: usize,

    /// Sources whose URL contains one of these survive failures and redundancy
    pub protected_keywords: Vec<String>,

    /// Treat a list without any domains as a failed fetch instead of dropping it
    pub empty_counts_as_failure: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_fails: 3,
            wildcard_threshold: 10,
            protected_keywords: DEFAULT_PROTECTED_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            empty_counts_as_failure: false,
        }
    }
}

/// HTTP behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FetchConfig {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Pause between two source fetches in milliseconds
    pub request_delay_ms: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 45,
            request_delay_ms: 0,
            user_agent: concat!("blockmerge/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Public suffix handling
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SuffixConfig {
    /// Inline public suffix rules
    pub public_suffixes: Vec<String>,

    /// File in public suffix list format
    pub list_path: Option<PathBuf>,
}
