//! blockmerge main entry point
//!
//! This is the command-line interface for the blockmerge list merger.

use anyhow::Context;
use blockmerge::config::{load_config_with_hash, Config};
use blockmerge::output::print_statistics;
use blockmerge::pipeline::run_merge;
use blockmerge::storage::{FileStorage, Storage};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// blockmerge: a self-pruning domain blocklist merger
///
/// blockmerge fetches every source in the registry, merges their domains into
/// one minimal blocklist, and rewrites the registry without the sources that
/// turned out redundant, mirrored, or dead.
#[derive(Parser, Debug)]
#[command(name = "blockmerge")]
#[command(version)]
#[command(about = "A self-pruning domain blocklist merger", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show which sources would be fetched without fetching or writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_merge(&config, cli.quiet).await
    }
}

/// Loads the configuration file, or the built-in defaults without one
fn load(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using built-in defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("invalid configuration {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", &hash[..16]);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("blockmerge=info,warn"),
            1 => EnvFilter::new("blockmerge=debug,info"),
            2 => EnvFilter::new("blockmerge=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the fetch plan without network access
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let storage = FileStorage::new(config.paths.clone());
    let registry = storage.load_registry()?;
    let whitelist = storage.load_whitelist()?;
    // Loading the table up front surfaces a broken suffix list in the dry run
    config.suffix_policy()?;

    println!("=== blockmerge Dry Run ===\n");

    println!("Merge Configuration:");
    println!("  Max fails: {}", config.merge.max_fails);
    println!("  Wildcard threshold: {}", config.merge.wildcard_threshold);
    println!(
        "  Protected keywords: {}",
        config.merge.protected_keywords.join(", ")
    );
    println!(
        "  Empty lists count as failure: {}",
        config.merge.empty_counts_as_failure
    );
    if config.suffix.public_suffixes.is_empty() && config.suffix.list_path.is_none() {
        println!("  Suffix policy: last two labels");
    } else {
        println!("  Suffix policy: public suffix table");
    }

    println!("\nFiles:");
    println!("  Sources: {}", config.paths.sources.display());
    println!(
        "  Whitelist: {} ({} entries)",
        config.paths.whitelist.display(),
        whitelist.len()
    );
    println!("  Blocklist: {}", config.paths.blocklist.display());
    match &config.paths.status {
        Some(status) => println!("  Status: {}", status.display()),
        None => println!("  Status: (disabled)"),
    }

    println!("\nFetch Order ({} sources):", registry.len());
    for source in &registry {
        let mut markers = Vec::new();
        if source.is_master {
            markers.push("master".to_string());
        }
        if source.is_protected(&config.merge.protected_keywords) {
            markers.push("protected".to_string());
        }
        if source.fail_count > 0 {
            markers.push(format!("failed {}x", source.fail_count));
        }

        if markers.is_empty() {
            println!("  - {}", source.url);
        } else {
            println!("  - {} [{}]", source.url, markers.join(", "));
        }
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Handles the main merge operation
async fn handle_merge(config: &Config, quiet: bool) -> anyhow::Result<()> {
    match run_merge(config).await {
        Ok(outcome) => {
            if !quiet {
                println!();
                print_statistics(&outcome.stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Merge failed: {}", e);
            Err(e.into())
        }
    }
}
