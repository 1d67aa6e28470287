//! SQLite sink implementation
//!
//! The three sink parameters map onto SQLite as follows:
//! - `endpoint` is the database file
//! - `database` is the schema name the file is attached under
//! - `collection` is the table inside that schema

use crate::config::SinkConfig;
use crate::model::EventRecord;
use crate::sink::schema::{create_table_sql, insert_sql};
use crate::sink::traits::{EventSink, SinkError, SinkResult};
use chrono::Utc;
use rusqlite::{params, Connection};

/// SQLite-backed event sink
pub struct SqliteSink {
    conn: Connection,
    namespace: String,
    collection: String,
}

impl std::fmt::Debug for SqliteSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteSink")
            .field("namespace", &self.namespace)
            .field("collection", &self.collection)
            .finish()
    }
}

impl SqliteSink {
    /// Connects to the sink described by `config`
    ///
    /// # Arguments
    ///
    /// * `config` - Sink parameters, after environment overrides
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Database attached and collection table ready
    /// * `Err(SinkError::MissingParameter)` - A parameter was never supplied
    /// * `Err(SinkError)` - The database could not be opened or prepared
    pub fn connect(config: &SinkConfig) -> SinkResult<Self> {
        let endpoint = require("endpoint", &config.endpoint)?;
        let namespace = require("database", &config.database)?;
        let collection = require("collection", &config.collection)?;

        check_identifier("database", namespace)?;
        check_identifier("collection", collection)?;

        let conn = Connection::open_in_memory()?;
        conn.execute(
            &format!("ATTACH DATABASE ?1 AS {}", namespace),
            params![endpoint],
        )?;
        conn.execute_batch(&create_table_sql(namespace, collection))?;

        tracing::debug!(
            "Sink ready: {} attached as {}, collection {}",
            endpoint,
            namespace,
            collection
        );

        Ok(Self {
            conn,
            namespace: namespace.to_string(),
            collection: collection.to_string(),
        })
    }

    /// Number of rows currently in the collection
    pub fn count(&self) -> SinkResult<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}.{}", self.namespace, self.collection),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl EventSink for SqliteSink {
    fn insert_many(&mut self, records: &[EventRecord]) -> SinkResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let inserted_at = Utc::now().to_rfc3339();
        let sql = insert_sql(&self.namespace, &self.collection);

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                stmt.execute(params![
                    record.title,
                    record.date,
                    record.genre.as_str(),
                    record.time,
                    record.location,
                    record.price,
                    record.image,
                    record.excerpt,
                    record.is_featured,
                    inserted_at,
                ])?;
            }
        }
        tx.commit()?;

        Ok(records.len())
    }
}

fn require<'c>(name: &'static str, value: &'c Option<String>) -> SinkResult<&'c str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SinkError::MissingParameter(name)),
    }
}

fn check_identifier(name: &'static str, value: &str) -> SinkResult<()> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false)
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(SinkError::InvalidParameter {
            name,
            message: format!("'{}' is not a plain identifier", value),
        });
    }

    Ok(())
}
