//! Record file writing

use super::document::RecordDocument;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// Write a record document to disk
///
/// # Errors
/// Returns an error if serialization or file writing fails.
pub fn write_record<P: AsRef<Path>>(doc: &RecordDocument, path: P) -> Result<()> {
    let json = serialize_record(doc)?;
    fs::write(path, json)?;
    Ok(())
}

/// Serialize a record document to pretty-printed JSON, keys in document order
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn serialize_record(doc: &RecordDocument) -> Result<String> {
    let json = serde_json::to_string_pretty(doc)?;
    Ok(json)
}
