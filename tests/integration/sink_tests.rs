//! Integration tests for record persistence
//!
//! These tests store harvested records in a temporary SQLite file and a
//! temporary JSON dump.

use event_harvest::config::{apply_sink_overrides, SinkConfig};
use event_harvest::harvest::{deliver, Delivery};
use event_harvest::model::EventRecord;
use event_harvest::normalize::{compose_excerpt, Genre};
use event_harvest::output::{read_json, write_json};
use event_harvest::sink::{EventSink, SinkError, SqliteSink};
use rusqlite::Connection;
use std::collections::HashMap;
use tempfile::TempDir;

fn create_test_record(title: &str, genre: Genre) -> EventRecord {
    let link = format!("https://example.com/events/{}", title.to_lowercase());
    EventRecord {
        title: Some(title.to_string()),
        date: "2026-11-20T00:00:00.000+00:00".to_string(),
        genre,
        time: Some("7:30 PM".to_string()),
        location: Some("The Annex".to_string()),
        price: None,
        image: None,
        excerpt: compose_excerpt(Some("Doors at seven"), Some(&link)),
        is_featured: false,
    }
}

fn sink_config(dir: &TempDir) -> SinkConfig {
    SinkConfig {
        endpoint: Some(dir.path().join("events.db").to_string_lossy().into_owned()),
        database: Some("harvest".to_string()),
        collection: Some("shows".to_string()),
    }
}

#[test]
fn test_bulk_insert_persists_to_file() {
    let dir = TempDir::new().unwrap();
    let config = sink_config(&dir);
    let records = vec![
        create_test_record("Alpha", Genre::Rock),
        create_test_record("Beta", Genre::Unknown),
        create_test_record("Gamma", Genre::HipHop),
    ];

    let delivery = deliver(&records, || SqliteSink::connect(&config)).unwrap();
    assert_eq!(delivery, Delivery::Inserted(3));

    // Read back through a plain connection to the endpoint file
    let conn = Connection::open(dir.path().join("events.db")).unwrap();
    let mut stmt = conn
        .prepare("SELECT title, genre, is_featured FROM shows ORDER BY id")
        .unwrap();
    let rows: Vec<(String, String, bool)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(
        rows,
        vec![
            ("Alpha".to_string(), "rock".to_string(), false),
            ("Beta".to_string(), "unknown".to_string(), false),
            ("Gamma".to_string(), "hip hop".to_string(), false),
        ]
    );
}

#[test]
fn test_runs_append_to_collection() {
    let dir = TempDir::new().unwrap();
    let config = sink_config(&dir);

    let mut sink = SqliteSink::connect(&config).unwrap();
    sink.insert_many(&[create_test_record("One", Genre::Jazz)])
        .unwrap();
    drop(sink);

    let mut sink = SqliteSink::connect(&config).unwrap();
    sink.insert_many(&[
        create_test_record("Two", Genre::Jazz),
        create_test_record("Three", Genre::Jazz),
    ])
    .unwrap();

    assert_eq!(sink.count().unwrap(), 3);
}

#[test]
fn test_missing_parameter_is_fatal_before_insert() {
    let dir = TempDir::new().unwrap();
    let mut config = sink_config(&dir);
    config.collection = None;

    let records = vec![create_test_record("Alpha", Genre::Rock)];
    let result = deliver(&records, || SqliteSink::connect(&config));

    match result {
        Err(SinkError::MissingParameter(name)) => assert_eq!(name, "collection"),
        other => panic!("expected missing parameter, got {:?}", other),
    }
    assert!(!dir.path().join("events.db").exists());
}

#[test]
fn test_environment_overrides_fill_sink_parameters() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("from-env.db");

    let env: HashMap<&str, String> = [
        ("EVENT_HARVEST_SINK_ENDPOINT", db_path.to_string_lossy().into_owned()),
        ("EVENT_HARVEST_SINK_DATABASE", "harvest".to_string()),
        ("EVENT_HARVEST_SINK_COLLECTION", "events".to_string()),
    ]
    .into_iter()
    .collect();

    let mut config = SinkConfig::default();
    apply_sink_overrides(&mut config, |key| env.get(key).cloned());

    let mut sink = SqliteSink::connect(&config).unwrap();
    assert_eq!(
        sink.insert_many(&[create_test_record("Env", Genre::Soul)])
            .unwrap(),
        1
    );
    assert!(db_path.exists());
}

#[test]
fn test_json_dump_matches_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("out/events.json");
    let records = vec![
        create_test_record("Alpha", Genre::PostPunk),
        create_test_record("Beta", Genre::Unknown),
    ];

    write_json(&records, &path).unwrap();
    assert_eq!(read_json(&path).unwrap(), records);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[0]["genre"], "post punk");
    assert_eq!(raw[0]["isFeatured"], false);
    assert!(raw[1]["price"].is_null());
}
