//! Source reliability state machine
//!
//! Turns what happened to a source during a run into a [`SourceOutcome`], and the
//! outcome into the source's next registry entry.
//!
//! | Observation | Source | Outcome | Registry |
//! |-------------|--------|---------|----------|
//! | fetched | master | Master | kept, counter reset |
//! | fetched | keyword-protected | Protected | kept, counter reset |
//! | fetched, new domains | ordinary | Ok | kept, counter reset |
//! | fetched, all covered | ordinary | Redundant | dropped |
//! | fetched, no domains | ordinary | Empty | dropped |
//! | mirror | master | Master | kept, counter reset |
//! | mirror | other | Mirror | dropped |
//! | failed | master / protected | OfflineKept | kept unchanged |
//! | failed, `fails + 1 < max` | ordinary | OfflineRetry | kept, counter + 1 |
//! | failed, `fails + 1 >= max` | ordinary | Dead | dropped |

use crate::registry::Source;
use crate::state::SourceOutcome;

/// What the pipeline observed for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Content was fetched and ingested
    Fetched {
        /// Domains extracted from the body (after the whitelist)
        raw_domains: usize,
        /// Domains that were new to the cover set
        new_domains: usize,
    },

    /// Content was byte-identical to an earlier non-master source of this run
    Mirror,

    /// Network error, rejected status, or an HTML page instead of a list
    Failed,
}

/// Decides source outcomes from observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReliabilityPolicy {
    /// Consecutive failures after which an ordinary source is dropped
    pub max_fails: u32,

    /// Treat a successful fetch without any domains as a failed fetch
    pub empty_counts_as_failure: bool,
}

impl ReliabilityPolicy {
    /// Creates a policy with the given fail limit
    pub fn new(max_fails: u32) -> Self {
        Self {
            max_fails,
            empty_counts_as_failure: false,
        }
    }

    /// Classifies the outcome of one source for this run
    ///
    /// `protected` is the keyword protection computed for this run; it is not part of
    /// the persisted source.
    pub fn classify(
        &self,
        source: &Source,
        protected: bool,
        observation: Observation,
    ) -> SourceOutcome {
        match observation {
            Observation::Failed => self.classify_failure(source, protected),

            Observation::Fetched { raw_domains: 0, .. } if self.empty_counts_as_failure => {
                self.classify_failure(source, protected)
            }

            Observation::Mirror => {
                if source.is_master {
                    SourceOutcome::Master
                } else {
                    SourceOutcome::Mirror
                }
            }

            Observation::Fetched {
                raw_domains,
                new_domains,
            } => {
                if source.is_master {
                    SourceOutcome::Master
                } else if protected {
                    SourceOutcome::Protected
                } else if new_domains > 0 {
                    SourceOutcome::Ok
                } else if raw_domains == 0 {
                    SourceOutcome::Empty
                } else {
                    SourceOutcome::Redundant
                }
            }
        }
    }

    fn classify_failure(&self, source: &Source, protected: bool) -> SourceOutcome {
        if source.is_master || protected {
            SourceOutcome::OfflineKept
        } else if source.fail_count.saturating_add(1) < self.max_fails {
            SourceOutcome::OfflineRetry
        } else {
            SourceOutcome::Dead
        }
    }

    /// Produces the source's next registry entry, or `None` if it is dropped
    pub fn apply(&self, source: Source, outcome: SourceOutcome) -> Option<Source> {
        match outcome {
            SourceOutcome::Master | SourceOutcome::Protected | SourceOutcome::Ok => {
                Some(source.with_fail_count(0))
            }
            SourceOutcome::OfflineKept => Some(source),
            SourceOutcome::OfflineRetry => {
                let next = source.fail_count.saturating_add(1);
                Some(source.with_fail_count(next))
            }
            SourceOutcome::Redundant
            | SourceOutcome::Empty
            | SourceOutcome::Mirror
            | SourceOutcome::Dead => None,
        }
    }
}

impl Default for ReliabilityPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
