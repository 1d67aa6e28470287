//! Configuration module for Event-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Field selectors live here rather than in code, so the extraction logic can be
//! pointed at a different site by editing the file.
//!
//! # Example
//!
//! ```no_run
//! use event_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Listing: {}", config.listing.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DriverConfig, Field, ListingConfig, OutputConfig, SelectorConfig, SinkConfig, Strategy,
    TimingConfig, WaitCondition,
};

// Re-export parser functions
pub use parser::{
    apply_sink_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
    ENV_SINK_COLLECTION, ENV_SINK_DATABASE, ENV_SINK_ENDPOINT,
};
