//! Per-run outcome definitions for sources
//!
//! Every source ends a run in exactly one of these outcomes; the outcome decides
//! whether and how the source is written back to the registry.

use std::fmt;

/// The outcome of processing one source in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceOutcome {
    // ===== Kept after a successful fetch =====
    /// Master source fetched successfully
    Master,

    /// Keyword-protected source fetched successfully
    Protected,

    /// Ordinary source that contributed at least one new domain
    Ok,

    // ===== Dropped after a successful fetch =====
    /// Ordinary source whose domains were all already covered
    Redundant,

    /// Ordinary source whose body held no domains at all
    Empty,

    /// Body was byte-identical to a source fetched earlier this run
    Mirror,

    // ===== Fetch failures =====
    /// Failed, but master or keyword-protected: kept unchanged
    OfflineKept,

    /// Failed, kept with an incremented fail counter
    OfflineRetry,

    /// Failed too many times in a row: dropped
    Dead,
}

impl SourceOutcome {
    /// Returns true if the source stays in the registry
    pub fn is_kept(&self) -> bool {
        matches!(
            self,
            Self::Master | Self::Protected | Self::Ok | Self::OfflineKept | Self::OfflineRetry
        )
    }

    /// Returns true if the source is removed from the registry
    pub fn is_dropped(&self) -> bool {
        !self.is_kept()
    }

    /// Returns true if the fetch failed
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::OfflineKept | Self::OfflineRetry | Self::Dead)
    }

    /// Fixed-width label used in the per-source console line
    pub fn label(&self) -> &'static str {
        match self {
            Self::Master => "MASTER",
            Self::Protected => "PROTECT",
            Self::Ok => "OK",
            Self::Redundant => "REDUND.",
            Self::Empty => "EMPTY",
            Self::Mirror => "MIRROR",
            Self::OfflineKept => "OFFLINE",
            Self::OfflineRetry => "RETRY",
            Self::Dead => "DEAD",
        }
    }

    /// Returns all possible outcomes
    pub fn all() -> [Self; 9] {
        [
            Self::Master,
            Self::Protected,
            Self::Ok,
            Self::Redundant,
            Self::Empty,
            Self::Mirror,
            Self::OfflineKept,
            Self::OfflineRetry,
            Self::Dead,
        ]
    }
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
