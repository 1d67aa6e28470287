//! Sink traits and error types

use crate::model::EventRecord;
use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    /// A connection parameter was never supplied; no insert was attempted
    #[error("Missing sink parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid sink parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl SinkError {
    /// True for configuration problems, as opposed to failures of the write itself
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter(_) | Self::InvalidParameter { .. }
        )
    }
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for a run's records
pub trait EventSink {
    /// Inserts all records in one bulk operation
    ///
    /// # Returns
    ///
    /// The number of records written; `Ok(0)` for an empty slice
    fn insert_many(&mut self, records: &[EventRecord]) -> SinkResult<usize>;
}
