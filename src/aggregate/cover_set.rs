//! Domain cover set
//!
//! A [`CoverSet`] is a set of domains in which no member lies below another member:
//! blocking `example.com` already blocks `ads.example.com`, so the latter carries no
//! information once the former is present. Ancestor walks stop at the registrable
//! domain chosen by the set's [`SuffixPolicy`].

use crate::domain::{Domain, SuffixPolicy, TwoLabelRule};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Orders domains so that every ancestor sorts before all of its descendants
///
/// Label count first (an ancestor always has fewer labels), then string length,
/// then the string itself so the order is total.
pub fn ancestor_order(a: &Domain, b: &Domain) -> Ordering {
    (a.label_count(), a.as_str().len(), a.as_str()).cmp(&(
        b.label_count(),
        b.as_str().len(),
        b.as_str(),
    ))
}

/// A growing set of domains with incremental ancestor checks
#[derive(Debug, Clone)]
pub struct CoverSet {
    members: HashSet<Domain>,
    policy: Arc<dyn SuffixPolicy>,
}

impl CoverSet {
    /// Creates an empty cover set using the given suffix policy
    pub fn new(policy: Arc<dyn SuffixPolicy>) -> Self {
        Self {
            members: HashSet::new(),
            policy,
        }
    }

    /// Returns the suffix policy of this set
    pub fn policy(&self) -> &Arc<dyn SuffixPolicy> {
        &self.policy
    }

    /// Returns false if some strict ancestor of `domain` is already a member
    ///
    /// Ancestors are checked from the most specific one down to the registrable
    /// domain; the domain itself is not checked.
    pub fn accepts(&self, domain: &Domain) -> bool {
        self.covering_ancestor(domain).is_none()
    }

    /// Returns the most specific member that covers `domain`, if any
    pub fn covering_ancestor<'a>(&self, domain: &'a Domain) -> Option<&'a str> {
        let min_labels = self.policy.registrable_labels(domain);
        domain
            .ancestors(min_labels)
            .find(|ancestor| self.members.contains(*ancestor))
    }

    /// Inserts `domain` if it is not covered; returns true if the set grew
    pub fn insert(&mut self, domain: Domain) -> bool {
        if !self.accepts(&domain) {
            return false;
        }
        self.members.insert(domain)
    }

    /// Inserts candidates one at a time in the given order
    ///
    /// Each candidate is tested against everything inserted before it, including
    /// earlier candidates from the same batch. Returns the number of new members.
    ///
    /// ```
    /// use blockmerge::{CoverSet, Domain};
    ///
    /// let mut set = CoverSet::default();
    /// let batch = ["example.com", "tracker.example.com", "ads.tracker.example.com"]
    ///     .iter()
    ///     .map(|d| Domain::parse(d).unwrap());
    /// assert_eq!(set.insert_batch(batch), 1);
    /// assert!(set.contains("example.com"));
    /// ```
    pub fn insert_batch<I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = Domain>,
    {
        let mut added = 0;
        for candidate in candidates {
            if self.insert(candidate) {
                added += 1;
            }
        }
        added
    }

    /// Rebuilds the set so that no member is a descendant of another
    ///
    /// During ingestion a broad domain can arrive after its descendants; this pass
    /// re-inserts every member in [`ancestor_order`], which keeps exactly the members
    /// that have no ancestor in the set.
    pub fn optimize(&self) -> CoverSet {
        let mut optimized = CoverSet::new(Arc::clone(&self.policy));
        for domain in self.in_ancestor_order() {
            optimized.insert(domain.clone());
        }
        optimized
    }

    /// Returns the members sorted by [`ancestor_order`]
    pub fn in_ancestor_order(&self) -> Vec<&Domain> {
        let mut ordered: Vec<&Domain> = self.members.iter().collect();
        ordered.sort_by(|a, b| ancestor_order(a, b));
        ordered
    }

    /// Returns the members sorted lexicographically
    pub fn to_sorted_vec(&self) -> Vec<Domain> {
        let mut sorted: Vec<Domain> = self.members.iter().cloned().collect();
        sorted.sort();
        sorted
    }

    /// Returns true if `domain` is a member (exact match)
    pub fn contains(&self, domain: &str) -> bool {
        self.members.contains(domain)
    }

    /// Returns the number of members
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the set has no members
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the members in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.members.iter()
    }
}

impl Default for CoverSet {
    fn default() -> Self {
        Self::new(Arc::new(TwoLabelRule))
    }
}
