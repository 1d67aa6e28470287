use crate::config::types::{Config, SinkConfig};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable overriding `[sink] endpoint`
pub const ENV_SINK_ENDPOINT: &str = "EVENT_HARVEST_SINK_ENDPOINT";

/// Environment variable overriding `[sink] database`
pub const ENV_SINK_DATABASE: &str = "EVENT_HARVEST_SINK_DATABASE";

/// Environment variable overriding `[sink] collection`
pub const ENV_SINK_COLLECTION: &str = "EVENT_HARVEST_SINK_COLLECTION";

/// Loads and parses a configuration file from the given path
///
/// Sink parameters found in the process environment take precedence over
/// the file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_sink_overrides(&mut config.sink, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

/// Parses and validates configuration text without touching the environment
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Overrides sink parameters with values returned by `lookup`
///
/// Empty values are ignored so an exported-but-blank variable does not
/// erase a parameter set in the file.
pub fn apply_sink_overrides<F>(sink: &mut SinkConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(endpoint) = pick(ENV_SINK_ENDPOINT) {
        sink.endpoint = Some(endpoint);
    }
    if let Some(database) = pick(ENV_SINK_DATABASE) {
        sink.database = Some(database);
    }
    if let Some(collection) = pick(ENV_SINK_COLLECTION) {
        sink.collection = Some(collection);
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be traced back to the exact selectors used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
