use crate::config::types::RunConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(RunConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: RunConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

/// Computes the reproducibility fingerprint of a configuration
///
/// The fingerprint covers the ordered site list and the rate/retry
/// parameters only, so cosmetic edits (output paths, worker count) do not
/// change it. It is recorded in the summary artifact for auditing.
///
/// # Returns
///
/// Hex-encoded SHA-256 digest
pub fn config_fingerprint(config: &RunConfig) -> String {
    let mut hasher = Sha256::new();

    for url in &config.sites.urls {
        hasher.update(url.as_str().as_bytes());
        hasher.update(b"\n");
    }

    hasher.update(config.rate_limit.requests_per_minute.to_le_bytes());
    hasher.update(config.fetch.timeout_secs.to_le_bytes());
    hasher.update(config.fetch.max_retries.to_le_bytes());
    hasher.update(config.fetch.retry_backoff_ms.to_le_bytes());

    hex::encode(hasher.finalize())
}

/// Loads a configuration and returns both the config and its fingerprint
pub fn load_config_with_fingerprint(path: &Path) -> Result<(RunConfig, String), ConfigError> {
    let config = load_config(path)?;
    let fingerprint = config_fingerprint(&config);
    Ok((config, fingerprint))
}
