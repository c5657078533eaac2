//! Run-scoped state
//!
//! Everything a run accumulates lives in one [`RunContext`] that the coordinator
//! threads through its stages. Nothing here outlives the run.

use crate::aggregate::{CoverSet, MirrorIndex};
use crate::domain::SuffixPolicy;
use crate::output::RunStats;
use std::sync::Arc;

/// Mutable state of one merge run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Domains accepted so far
    pub cover: CoverSet,

    /// Bodies fetched so far, by fingerprint
    pub mirrors: MirrorIndex,

    /// Counters for the final report
    pub stats: RunStats,
}

impl RunContext {
    /// Creates an empty context using the given suffix policy
    pub fn new(policy: Arc<dyn SuffixPolicy>) -> Self {
        Self {
            cover: CoverSet::new(policy),
            mirrors: MirrorIndex::new(),
            stats: RunStats::default(),
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self {
            cover: CoverSet::default(),
            mirrors: MirrorIndex::new(),
            stats: RunStats::default(),
        }
    }
}
