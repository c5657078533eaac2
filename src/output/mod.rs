//! Output module for reports and result files
//!
//! This module handles:
//! - Rendering the blocklist and status file formats
//! - Collecting and printing run statistics
//! - The per-source console line

mod format;
pub mod stats;

pub use format::{format_blocklist, format_status, BLOCKLIST_HEADER};
pub use stats::{print_statistics, RunStats};

use crate::registry::Source;
use crate::state::SourceOutcome;

/// Formats the log line for one processed source
///
/// ```
/// use blockmerge::output::source_line;
/// use blockmerge::{Source, SourceOutcome};
///
/// let source = Source::new("https://lists.test/ads/hosts.txt");
/// assert_eq!(
///     source_line(SourceOutcome::Ok, 42, &source),
///     "OK      |         42 new | hosts.txt"
/// );
/// ```
pub fn source_line(outcome: SourceOutcome, new_domains: usize, source: &Source) -> String {
    if outcome.is_failure() {
        format!(
            "{:<7} | {:>10}     | {}",
            outcome.label(),
            "-",
            source.display_name()
        )
    } else {
        format!(
            "{:<7} | {:>10} new | {}",
            outcome.label(),
            new_domains,
            source.display_name()
        )
    }
}
