//! Text formats of the blocklist and status files

use crate::domain::Domain;
use chrono::{DateTime, Utc};

/// First header line of the blocklist file
pub const BLOCKLIST_HEADER: &str = "# Optimized Blocklist";

/// Renders the blocklist: two header lines, then one domain per line
///
/// Domains are written in the given order; callers pass them sorted.
///
/// ```
/// use blockmerge::output::format_blocklist;
/// use blockmerge::Domain;
///
/// let text = format_blocklist(&[Domain::parse("ads.test").unwrap()]);
/// assert_eq!(text, "# Optimized Blocklist\n# Total Domains: 1\nads.test\n");
/// ```
pub fn format_blocklist(domains: &[Domain]) -> String {
    let mut out = String::with_capacity(64 + domains.len() * 24);
    out.push_str(BLOCKLIST_HEADER);
    out.push('\n');
    out.push_str(&format!("# Total Domains: {}\n", domains.len()));
    for domain in domains {
        out.push_str(domain.as_str());
        out.push('\n');
    }
    out
}

/// Renders the status file
pub fn format_status(total: usize, updated_at: DateTime<Utc>) -> String {
    format!(
        "Last Update: {}\nTotal: {}\n",
        updated_at.format("%Y-%m-%d %H:%M"),
        total
    )
}
