//! Merge coordinator - main run orchestration logic
//!
//! This module contains the main merge loop that coordinates all aspects of
//! a run, including:
//! - Fetching every source in registry order, one at a time
//! - Mirror detection, extraction and whitelist filtering
//! - Feeding the cover set and classifying each source
//! - The final optimization and promotion passes

use crate::aggregate::WildcardPromoter;
use crate::config::Config;
use crate::domain::{extract_domains, Domain};
use crate::fetcher::{decode_body, Fetch, FetchResult};
use crate::output::{source_line, RunStats};
use crate::pipeline::RunContext;
use crate::registry::{Registry, Source};
use crate::state::{Observation, ReliabilityPolicy, SourceOutcome};
use crate::storage::Whitelist;
use std::time::{Duration, Instant};

/// What happened to one source during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// URL of the source
    pub url: String,

    /// Outcome of this run
    pub outcome: SourceOutcome,

    /// Domains this source added to the cover set
    pub new_domains: usize,
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Pruned registry for the next run
    pub registry: Registry,

    /// Final domains, sorted
    pub domains: Vec<Domain>,

    /// Registrable domains created by wildcard promotion, sorted
    pub promoted: Vec<Domain>,

    /// Per-source results in processing order
    pub reports: Vec<SourceReport>,

    /// Run counters
    pub stats: RunStats,
}

/// Main merge coordinator structure
pub struct Coordinator<F> {
    fetcher: F,
    policy: ReliabilityPolicy,
    keywords: Vec<String>,
    whitelist: Whitelist,
    promoter: WildcardPromoter,
    request_delay: Duration,
}

impl<F: Fetch> Coordinator<F> {
    /// Creates a coordinator from the run configuration
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Where source bodies come from
    /// * `config` - The merge configuration
    /// * `whitelist` - Domains that are never blocked
    pub fn new(fetcher: F, config: &Config, whitelist: Whitelist) -> Self {
        Self {
            fetcher,
            policy: config.reliability_policy(),
            keywords: config.merge.protected_keywords.clone(),
            whitelist,
            promoter: WildcardPromoter::new(config.merge.wildcard_threshold),
            request_delay: Duration::from_millis(config.fetch.request_delay_ms),
        }
    }

    /// Runs the merge loop over every source of the registry
    ///
    /// Sources are processed strictly in registry order. After the last source the
    /// cover set is optimized and promoted; the returned registry holds every kept
    /// source with its updated fail counter.
    pub async fn run(&self, registry: Registry, mut ctx: RunContext) -> RunOutcome {
        let started = Instant::now();
        let total = registry.len();
        tracing::info!(
            "Merging {} sources ({} master)",
            total,
            registry.master_count()
        );

        let mut kept = Vec::with_capacity(total);
        let mut reports = Vec::with_capacity(total);

        for (index, source) in registry.into_iter().enumerate() {
            let report = self.process_source(&mut ctx, &source).await;

            if let Some(next) = self.policy.apply(source, report.outcome) {
                kept.push(next);
            }
            reports.push(report);

            if !self.request_delay.is_zero() && index + 1 < total {
                tokio::time::sleep(self.request_delay).await;
            }
        }

        ctx.stats.accepted = ctx.cover.len();

        tracing::info!("Final cover check over {} domains", ctx.cover.len());
        let optimized = ctx.cover.optimize();
        ctx.stats.after_optimization = optimized.len();

        let promotion = self.promoter.promote(&optimized);
        ctx.stats.promoted_wildcards = promotion.promoted.len();
        ctx.stats.final_domains = promotion.domains.len();
        ctx.stats.elapsed = started.elapsed();

        tracing::info!(
            "Reduced to {} domains ({} wildcards promoted)",
            promotion.domains.len(),
            promotion.promoted.len()
        );

        RunOutcome {
            registry: Registry::from_sources(kept),
            domains: promotion.domains,
            promoted: promotion.promoted,
            reports,
            stats: ctx.stats,
        }
    }

    /// Fetches, ingests and classifies a single source
    async fn process_source(&self, ctx: &mut RunContext, source: &Source) -> SourceReport {
        let protected = source.is_protected(&self.keywords);
        tracing::debug!("Fetching {}", source.url);

        let fetched = self.fetcher.fetch(&source.url).await;
        let failure = fetched.failure_reason();
        let observation = match fetched {
            FetchResult::Success { body, .. } => self.ingest(ctx, source, &body),
            _ => Observation::Failed,
        };

        let outcome = self.policy.classify(source, protected, observation);
        let new_domains = match observation {
            Observation::Fetched { new_domains, .. } => new_domains,
            _ => 0,
        };
        ctx.stats.record_outcome(outcome);

        let line = source_line(outcome, new_domains, source);
        match failure {
            Some(reason) => tracing::warn!("{} ({})", line, reason),
            None if outcome.is_failure() => tracing::warn!("{} (no domains)", line),
            None => tracing::info!("{}", line),
        }

        SourceReport {
            url: source.url.clone(),
            outcome,
            new_domains,
        }
    }

    /// Feeds a fetched body into the run state
    fn ingest(&self, ctx: &mut RunContext, source: &Source, body: &[u8]) -> Observation {
        if let Some(first) = ctx
            .mirrors
            .check_and_record(body, &source.url, source.is_master)
        {
            tracing::debug!("{} mirrors {}", source.url, first);
            return Observation::Mirror;
        }

        let extracted = extract_domains(&decode_body(body));
        let gross = extracted.len();
        let candidates: Vec<Domain> = extracted
            .into_iter()
            .filter(|domain| !self.whitelist.contains(domain.as_str()))
            .collect();

        ctx.stats.gross_domains += gross;
        ctx.stats.whitelist_hits += gross - candidates.len();

        let raw_domains = candidates.len();
        let new_domains = ctx.cover.insert_batch(candidates);
        tracing::trace!(
            "{}: {} extracted, {} after whitelist, {} new",
            source.url,
            gross,
            raw_domains,
            new_domains
        );

        Observation::Fetched {
            raw_domains,
            new_domains,
        }
    }
}
