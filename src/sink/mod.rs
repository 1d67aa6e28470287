//! Sink module for persisting harvested records
//!
//! Records are written in one bulk insert per run. The SQLite sink is the
//! only backend; anything implementing [`EventSink`] can take its place.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteSink;
pub use traits::{EventSink, SinkError, SinkResult};
