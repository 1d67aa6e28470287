//! JSON dump of a run's records

use crate::model::EventRecord;
use crate::output::OutputResult;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes records as a pretty-printed JSON array, replacing any previous file
///
/// # Arguments
///
/// * `records` - Records in collection order
/// * `path` - Destination file; missing parent directories are created
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the file
/// * `Err(OutputError)` - Failed to create or serialize
pub fn write_json(records: &[EventRecord], path: &Path) -> OutputResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads a dump written by [`write_json`]
pub fn read_json(path: &Path) -> OutputResult<Vec<EventRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
