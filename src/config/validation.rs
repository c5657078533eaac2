use crate::config::types::{Config, FetchConfig, MergeConfig, PathsConfig, SuffixConfig};
use crate::domain::SuffixTable;
use crate::ConfigError;
use std::path::Path;

/// Upper bound for the request timeout in seconds
const MAX_TIMEOUT_SECS: u64 = 600;

/// Upper bound for the pause between fetches in milliseconds
const MAX_REQUEST_DELAY_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_paths_config(&config.paths)?;
    validate_merge_config(&config.merge)?;
    validate_fetch_config(&config.fetch)?;
    validate_suffix_config(&config.suffix)?;
    Ok(())
}

/// Validates file locations
fn validate_paths_config(config: &PathsConfig) -> Result<(), ConfigError> {
    require_path("sources", &config.sources)?;
    require_path("whitelist", &config.whitelist)?;
    require_path("blocklist", &config.blocklist)?;
    if let Some(status) = &config.status {
        require_path("status", status)?;
    }
    Ok(())
}

fn require_path(name: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!(
            "paths.{} cannot be empty",
            name
        )));
    }
    Ok(())
}

/// Validates merge behavior
fn validate_merge_config(config: &MergeConfig) -> Result<(), ConfigError> {
    if config.max_fails < 1 {
        return Err(ConfigError::Validation(format!(
            "max-fails must be >= 1, got {}",
            config.max_fails
        )));
    }

    if config.wildcard_threshold < 2 {
        return Err(ConfigError::Validation(format!(
            "wildcard-threshold must be >= 2, got {}",
            config.wildcard_threshold
        )));
    }

    if let Some(keyword) = config
        .protected_keywords
        .iter()
        .find(|k| k.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "protected keywords cannot be empty, got '{}'",
            keyword
        )));
    }

    Ok(())
}

/// Validates HTTP behavior
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.timeout_secs < 1 || config.timeout_secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and {}, got {}",
            MAX_TIMEOUT_SECS, config.timeout_secs
        )));
    }

    if config.request_delay_ms > MAX_REQUEST_DELAY_MS {
        return Err(ConfigError::Validation(format!(
            "request-delay-ms must be <= {}, got {}",
            MAX_REQUEST_DELAY_MS, config.request_delay_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates inline public suffixes
fn validate_suffix_config(config: &SuffixConfig) -> Result<(), ConfigError> {
    let mut scratch = SuffixTable::new();
    for suffix in &config.public_suffixes {
        scratch.insert_rule(suffix)?;
    }

    if let Some(path) = &config.list_path {
        require_path("suffix.list-path", path)?;
    }

    Ok(())
}
