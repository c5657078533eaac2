//! Pipeline module for running a complete merge
//!
//! This module ties the stages together:
//! - Loading the registry and whitelist from storage
//! - Running the coordinator over every source
//! - Persisting the blocklist, the status file and the pruned registry

mod context;
mod coordinator;

pub use context::RunContext;
pub use coordinator::{Coordinator, RunOutcome, SourceReport};

use crate::config::Config;
use crate::fetcher::{Fetch, HttpFetcher};
use crate::storage::{FileStorage, Storage};
use crate::Result;
use chrono::Utc;

/// Runs a complete merge against the configured files over HTTP
///
/// # Arguments
///
/// * `config` - The merge configuration
///
/// # Returns
///
/// * `Ok(RunOutcome)` - Merge completed and all files were written
/// * `Err(MergeError)` - Missing registry, invalid suffix list, or an I/O failure
pub async fn run_merge(config: &Config) -> Result<RunOutcome> {
    let mut storage = FileStorage::new(config.paths.clone());
    let fetcher = HttpFetcher::from_config(&config.fetch)?;
    merge_with(config, &mut storage, fetcher).await
}

/// Runs a complete merge with an explicit storage backend and fetcher
///
/// The registry is read before anything else, so a missing registry aborts the
/// run without touching any output. Outputs are written only after every source
/// has been processed, and the registry goes last: a failed blocklist write leaves
/// the previous registry in place.
pub async fn merge_with<S, F>(config: &Config, storage: &mut S, fetcher: F) -> Result<RunOutcome>
where
    S: Storage,
    F: Fetch,
{
    let registry = storage.load_registry()?;
    let whitelist = storage.load_whitelist()?;
    let policy = config.suffix_policy()?;

    tracing::info!(
        "Loaded {} sources and {} whitelist entries",
        registry.len(),
        whitelist.len()
    );

    let coordinator = Coordinator::new(fetcher, config, whitelist);
    let outcome = coordinator.run(registry, RunContext::new(policy)).await;

    storage.save_blocklist(&outcome.domains)?;
    storage.save_status(outcome.domains.len(), Utc::now())?;
    storage.save_registry(&outcome.registry)?;

    tracing::info!(
        "Wrote {} domains, {} sources remain",
        outcome.domains.len(),
        outcome.registry.len()
    );

    Ok(outcome)
}
