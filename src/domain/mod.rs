//! Domain handling module for blockmerge
//!
//! This module provides the normalized [`Domain`] value type, line-level domain
//! extraction from fetched list bodies, and the suffix boundary policy that decides
//! where a domain's registrable part begins.

mod extract;
mod normalize;
mod suffix;

// Re-export main types and functions
pub use extract::{extract_domain, extract_domains};
pub use normalize::Domain;
pub use suffix::{SuffixPolicy, SuffixTable, TwoLabelRule};
