//! Table definition for event collections
//!
//! Namespace and collection names are validated identifiers; they are
//! spliced into the statements because SQLite cannot bind them.

/// Creates the collection table if it does not exist
pub fn create_table_sql(namespace: &str, collection: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS {ns}.{table} (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT,
    date TEXT NOT NULL,
    genre TEXT NOT NULL,
    time TEXT,
    location TEXT,
    price TEXT,
    image TEXT,
    excerpt TEXT NOT NULL,
    is_featured INTEGER NOT NULL DEFAULT 0,
    inserted_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS {ns}.idx_{table}_date ON {table}(date);
"#,
        ns = namespace,
        table = collection
    )
}

/// Parameterized insert of one record
pub fn insert_sql(namespace: &str, collection: &str) -> String {
    format!(
        "INSERT INTO {}.{} (title, date, genre, time, location, price, image, excerpt, is_featured, inserted_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        namespace, collection
    )
}
