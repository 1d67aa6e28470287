//! Output module for run results
//!
//! This module handles:
//! - Dumping a run's records as a JSON document
//! - Tracking and printing the run report

mod json;
mod report;

pub use json::{read_json, write_json};
pub use report::{print_report, RunReport};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
