use crate::{DomainError, DomainResult};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a single DNS label
const MAX_LABEL_LEN: usize = 63;

/// A normalized hostname
///
/// A `Domain` is lowercase, has at least two dot-separated labels, and every label
/// consists of ASCII alphanumerics and hyphens (1..=63 chars, no leading or trailing
/// hyphen). The last label may not be purely numeric, which keeps IPv4 addresses
/// out of the domain space.
///
/// Equality is exact string equality, so two `Domain`s compare equal only when their
/// normalized forms are identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Domain(String);

impl Domain {
    /// Parses and normalizes a raw hostname
    ///
    /// Surrounding whitespace and a single trailing root dot are removed and the
    /// result is lowercased before validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockmerge::Domain;
    ///
    /// let domain = Domain::parse("Ads.Example.COM").unwrap();
    /// assert_eq!(domain.as_str(), "ads.example.com");
    ///
    /// assert!(Domain::parse("localhost").is_err());
    /// assert!(Domain::parse("127.0.0.1").is_err());
    /// ```
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Err(DomainError::Empty);
        }

        let normalized = trimmed.to_ascii_lowercase();

        let mut labels = 0;
        let mut last = "";
        for label in normalized.split('.') {
            if !is_valid_label(label) {
                return Err(DomainError::InvalidLabel {
                    domain: normalized.clone(),
                    label: label.to_string(),
                });
            }
            labels += 1;
            last = label;
        }

        if labels < 2 {
            return Err(DomainError::TooFewLabels(normalized));
        }

        if last.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::NumericTld(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized domain string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of labels (always at least two)
    pub fn label_count(&self) -> usize {
        self.0.bytes().filter(|b| *b == b'.').count() + 1
    }

    /// Iterates over the labels from left to right
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the last `labels` labels as a string slice
    ///
    /// Asking for at least as many labels as the domain has returns the whole domain.
    ///
    /// ```
    /// use blockmerge::Domain;
    ///
    /// let domain = Domain::parse("a.b.example.com").unwrap();
    /// assert_eq!(domain.suffix(2), "example.com");
    /// assert_eq!(domain.suffix(3), "b.example.com");
    /// assert_eq!(domain.suffix(9), "a.b.example.com");
    /// ```
    pub fn suffix(&self, labels: usize) -> &str {
        if labels == 0 {
            return "";
        }
        match self.0.rmatch_indices('.').nth(labels - 1) {
            Some((dot, _)) => &self.0[dot + 1..],
            None => &self.0,
        }
    }

    /// Iterates over the strict ancestors that keep at least `min_labels` labels
    ///
    /// Ancestors are yielded from the most specific (all but the first label) down to
    /// the least specific. The domain itself is never yielded.
    ///
    /// ```
    /// use blockmerge::Domain;
    ///
    /// let domain = Domain::parse("ads.tracker.example.com").unwrap();
    /// let ancestors: Vec<&str> = domain.ancestors(2).collect();
    /// assert_eq!(ancestors, vec!["tracker.example.com", "example.com"]);
    /// ```
    pub fn ancestors(&self, min_labels: usize) -> impl Iterator<Item = &str> + '_ {
        let total = self.label_count();
        let min_labels = min_labels.max(1);
        self.0
            .match_indices('.')
            .map(move |(dot, _)| &self.0[dot + 1..])
            .enumerate()
            .take_while(move |(idx, _)| total - (idx + 1) >= min_labels)
            .map(|(_, ancestor)| ancestor)
    }

    /// Returns true if `self` lies strictly below `other` in the DNS hierarchy
    pub fn is_descendant_of(&self, other: &Domain) -> bool {
        self.0.len() > other.0.len()
            && self.0.ends_with(other.as_str())
            && self.0.as_bytes()[self.0.len() - other.0.len() - 1] == b'.'
    }

    /// Consumes the domain, returning the inner string
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Checks a single label against the hostname grammar
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Domain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Domain {
    fn borrow(&self) -> &str {
        &self.0
    }
}
