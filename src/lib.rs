//! Event-Harvest: a resilient event listing extractor
//!
//! This crate collects detail-page links from an infinitely scrolling listing,
//! extracts one event record per detail page using ordered fallback strategies,
//! normalizes the raw fields into a canonical schema and hands the records to
//! a persistence sink.

pub mod config;
pub mod driver;
pub mod harvest;
pub mod model;
pub mod normalize;
pub mod output;
pub mod sink;

use thiserror::Error;

/// Main error type for Event-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector for {field}: {message}")]
    InvalidSelector { field: String, message: String },
}

/// Result type alias for Event-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{collect_links, deliver, extract_details, retry, Delivery, Harvester};
pub use model::{EventRecord, LinkSet};
pub use normalize::{canonicalize_date, classify_genre, compose_excerpt, Genre};
