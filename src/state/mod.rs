//! State module for tracking source reliability
//!
//! This module decides, per run, what happens to every source in the registry.
//!
//! # Components
//!
//! - `SourceOutcome`: the outcome of one source in one run (ok, redundant, mirror, dead, ...)
//! - `Observation`: what the pipeline saw while processing the source
//! - `ReliabilityPolicy`: maps observations to outcomes and outcomes to registry entries

mod outcome;
mod reliability;

// Re-export main types
pub use outcome::SourceOutcome;
pub use reliability::{Observation, ReliabilityPolicy};
