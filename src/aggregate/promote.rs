//! Adaptive wildcard promotion
//!
//! Ad and tracking networks often run dozens of throwaway subdomains under one
//! registrable domain. Once the number of cover set members sharing a registrable
//! domain reaches the threshold, the promoter replaces all of them with that one
//! domain, accepting some over-blocking in exchange for a much shorter list.

use crate::aggregate::cover_set::CoverSet;
use crate::domain::Domain;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Default sibling count that triggers promotion
pub const DEFAULT_WILDCARD_THRESHOLD: usize = 10;

/// Result of the promotion pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Promotion {
    /// Final domains, sorted lexicographically
    pub domains: Vec<Domain>,

    /// Registrable domains that replaced their siblings, sorted lexicographically
    pub promoted: Vec<Domain>,
}

/// Collapses large sibling clusters into their registrable domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WildcardPromoter {
    threshold: usize,
}

impl WildcardPromoter {
    /// Creates a promoter that fires at `threshold` members per registrable domain
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    /// Runs the promotion pass over an optimized cover set
    ///
    /// Promoted parents go into the output first. Members under a promoted parent
    /// are dropped; every other member passes the ancestor check again, since a
    /// promoted parent may now cover it.
    ///
    /// ```
    /// use blockmerge::aggregate::WildcardPromoter;
    /// use blockmerge::{CoverSet, Domain};
    ///
    /// let mut set = CoverSet::default();
    /// set.insert_batch((0..12).map(|i| Domain::parse(&format!("n{}.cdn.example", i)).unwrap()));
    ///
    /// let promotion = WildcardPromoter::new(10).promote(&set);
    /// assert_eq!(promotion.domains, vec![Domain::parse("cdn.example").unwrap()]);
    /// ```
    pub fn promote(&self, cover: &CoverSet) -> Promotion {
        let policy = Arc::clone(cover.policy());

        let mut sibling_counts: HashMap<&str, usize> = HashMap::new();
        for domain in cover.iter() {
            *sibling_counts.entry(policy.registrable(domain)).or_insert(0) += 1;
        }

        let promoted_parents: HashSet<&str> = sibling_counts
            .iter()
            .filter(|&(_, &count)| count >= self.threshold)
            .map(|(&parent, _)| parent)
            .collect();

        let mut promoted: Vec<Domain> = promoted_parents
            .iter()
            .filter_map(|parent| Domain::parse(parent).ok())
            .collect();
        promoted.sort();

        for parent in &promoted {
            tracing::debug!(
                "Promoting {} ({} members)",
                parent,
                sibling_counts.get(parent.as_str()).copied().unwrap_or(0)
            );
        }

        let mut output = CoverSet::new(Arc::clone(&policy));
        for parent in &promoted {
            output.insert(parent.clone());
        }
        for domain in cover.in_ancestor_order() {
            if promoted_parents.contains(policy.registrable(domain)) {
                continue;
            }
            output.insert(domain.clone());
        }

        Promotion {
            domains: output.to_sorted_vec(),
            promoted,
        }
    }
}

impl Default for WildcardPromoter {
    fn default() -> Self {
        Self::new(DEFAULT_WILDCARD_THRESHOLD)
    }
}
