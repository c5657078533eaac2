//! Aggregation of domains across sources
//!
//! # Components
//!
//! - `CoverSet`: the deduplicated set where no member covers another
//! - `WildcardPromoter`: collapses large sibling clusters into their parent
//! - `MirrorIndex`: detects sources that serve a body already seen this run

mod cover_set;
mod mirror;
mod promote;

pub use cover_set::{ancestor_order, CoverSet};
pub use mirror::{fingerprint, Fingerprint, MirrorIndex};
pub use promote::{Promotion, WildcardPromoter, DEFAULT_WILDCARD_THRESHOLD};
