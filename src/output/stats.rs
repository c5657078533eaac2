//! Run statistics
//!
//! This module provides the counters collected during a merge run and the
//! console summary printed at its end.

use crate::state::SourceOutcome;
use std::collections::BTreeMap;
use std::time::Duration;

/// Merge run statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Number of sources per outcome
    pub outcomes: BTreeMap<SourceOutcome, usize>,

    /// Domains extracted from all fetched bodies, before the whitelist
    pub gross_domains: usize,

    /// Extracted domains dropped by an exact whitelist match
    pub whitelist_hits: usize,

    /// Domains accepted into the cover set during ingestion
    pub accepted: usize,

    /// Members left after the final optimization pass
    pub after_optimization: usize,

    /// Registrable domains that replaced their subdomains
    pub promoted_wildcards: usize,

    /// Domains written to the blocklist
    pub final_domains: usize,

    /// Wall time of the run
    pub elapsed: Duration,
}

impl RunStats {
    /// Counts one source outcome
    pub fn record_outcome(&mut self, outcome: SourceOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }

    /// Returns how many sources ended with `outcome`
    pub fn outcome_count(&self, outcome: SourceOutcome) -> usize {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Total number of processed sources
    pub fn sources(&self) -> usize {
        self.outcomes.values().sum()
    }

    /// Number of sources that stay in the registry
    pub fn kept_sources(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| outcome.is_kept())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStats) {
    println!("=== Merge Statistics ===\n");

    println!(
        "Sources: {} processed, {} kept, {} dropped",
        stats.sources(),
        stats.kept_sources(),
        stats.sources() - stats.kept_sources()
    );
    for (outcome, count) in &stats.outcomes {
        println!("  {:<8} {}", outcome.label(), count);
    }
    println!();

    println!("Domains:");
    println!("  Extracted: {}", stats.gross_domains);
    println!("  Whitelisted: {}", stats.whitelist_hits);
    println!("  Accepted: {}", stats.accepted);
    println!("  After optimization: {}", stats.after_optimization);
    println!("  Promoted wildcards: {}", stats.promoted_wildcards);
    println!("  Final: {}", stats.final_domains);
    println!();

    let reduction = if stats.gross_domains > 0 {
        100.0 - (stats.final_domains as f64 / stats.gross_domains as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "Reduction: {:.1}% of extracted entries removed in {:.1}s",
        reduction,
        stats.elapsed.as_secs_f64()
    );
}
