//! Suffix boundary policies
//!
//! The cover set never walks an ancestor chain past a domain's registrable part, and
//! the wildcard promoter groups siblings under that registrable part. Where the
//! registrable part starts is decided by a [`SuffixPolicy`]: either the plain
//! "last two labels" rule or a lookup in a public suffix table, so that unrelated
//! sites under `co.uk` or `github.io` are not lumped together.

use crate::domain::Domain;
use crate::{ConfigError, ConfigResult};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Decides how many trailing labels make up a domain's registrable part
pub trait SuffixPolicy: fmt::Debug + Send + Sync {
    /// Returns the number of trailing labels of the registrable domain
    ///
    /// The result is at least two and at most `domain.label_count()`.
    fn registrable_labels(&self, domain: &Domain) -> usize;

    /// Returns the registrable domain of `domain` as a string slice
    fn registrable<'a>(&self, domain: &'a Domain) -> &'a str {
        domain.suffix(self.registrable_labels(domain))
    }
}

/// Treats the last two labels of every domain as its registrable part
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoLabelRule;

impl SuffixPolicy for TwoLabelRule {
    fn registrable_labels(&self, domain: &Domain) -> usize {
        domain.label_count().min(2)
    }
}

/// Public suffix table in the format of the public suffix list
///
/// Supports plain rules (`co.uk`), wildcard rules (`*.ck`) and exception rules
/// (`!www.ck`), plus the implicit `*` rule under which any top-level label is a
/// public suffix.
#[derive(Debug, Clone, Default)]
pub struct SuffixTable {
    rules: HashSet<String>,
    wildcards: HashSet<String>,
    exceptions: HashSet<String>,
}

impl SuffixTable {
    /// Creates an empty table (behaves like [`TwoLabelRule`])
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single rule in public suffix list syntax
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the rule is not a dot-separated
    /// sequence of hostname labels after removing the `*.` or `!` marker.
    pub fn insert_rule(&mut self, rule: &str) -> ConfigResult<()> {
        let rule = rule.trim().to_ascii_lowercase();

        let (target, body) = if let Some(body) = rule.strip_prefix('!') {
            (&mut self.exceptions, body)
        } else if let Some(body) = rule.strip_prefix("*.") {
            (&mut self.wildcards, body)
        } else {
            (&mut self.rules, rule.as_str())
        };

        validate_suffix(body)?;
        target.insert(body.to_string());
        Ok(())
    }

    /// Parses a table from public suffix list text
    ///
    /// Blank lines and `//` comments are skipped. Only the first whitespace-separated
    /// token of a line is read, as the list format prescribes. Rules with non-ASCII
    /// labels are skipped because blocklist domains are always ASCII.
    pub fn parse_list(text: &str) -> Self {
        let mut table = Self::new();
        let mut skipped = 0usize;

        for line in text.lines() {
            let Some(token) = line.split_whitespace().next() else {
                continue;
            };
            if token.starts_with("//") {
                continue;
            }
            if table.insert_rule(token).is_err() {
                skipped += 1;
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} unusable public suffix rules", skipped);
        }

        table
    }

    /// Loads a table from a public suffix list file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse_list(&content))
    }

    /// Returns the total number of rules in the table
    pub fn len(&self) -> usize {
        self.rules.len() + self.wildcards.len() + self.exceptions.len()
    }

    /// Returns true if the table holds no rules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of trailing labels forming the public suffix of `domain`
    pub fn public_suffix_labels(&self, domain: &Domain) -> usize {
        let total = domain.label_count();
        let mut matched = 1;

        for labels in 1..=total {
            let candidate = domain.suffix(labels);

            if self.exceptions.contains(candidate) {
                return labels - 1;
            }

            let wildcard_hit = labels > 1 && self.wildcards.contains(domain.suffix(labels - 1));
            if self.rules.contains(candidate) || wildcard_hit {
                matched = labels;
            }
        }

        matched
    }
}

impl SuffixPolicy for SuffixTable {
    fn registrable_labels(&self, domain: &Domain) -> usize {
        let total = domain.label_count();
        (self.public_suffix_labels(domain) + 1).max(2).min(total)
    }
}

/// Checks that a suffix rule body is a sequence of hostname labels
fn validate_suffix(body: &str) -> ConfigResult<()> {
    let valid = !body.is_empty()
        && body.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        });

    if valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidPattern(format!(
            "'{}' is not a valid public suffix",
            body
        )))
    }
}
