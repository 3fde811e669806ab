//! Dialogue document formats
//!
//! Two JSON encodings are understood:
//! - **Record** - the flat keyed format written by the dialogue editor
//! - **Typed** - a serialized [`GraphDocument`], nested and self-describing
//!
//! [`parse_graph_document`] detects which one it was handed.

pub mod record;
pub mod schema;

pub use record::{RecordDocument, RecordValue, parse_record, read_record, serialize_record, write_record};
pub use schema::{ActionRecord, ChoiceRecord, GraphDocument, NpcLineRecord, ParamKind, PlayerSetRecord};

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// On-disk encoding of a dialogue document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Flat record format (`playerDiags`, `pd_*`, `nd_*`, `ac_*`)
    Record,
    /// Serialized [`GraphDocument`]
    Typed,
}

impl DocumentFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Record => "record",
            DocumentFormat::Typed => "typed",
        }
    }
}

/// Work out which format a parsed record belongs to
#[must_use]
pub fn detect_format(doc: &RecordDocument) -> Option<DocumentFormat> {
    if doc.contains("playerDiags") {
        Some(DocumentFormat::Record)
    } else if doc.contains("player_sets") {
        Some(DocumentFormat::Typed)
    } else {
        None
    }
}

/// Parse a dialogue document in either format
///
/// # Errors
/// Returns an error if the JSON is malformed, the format is not recognised,
/// or required fields are missing.
pub fn parse_graph_document(content: &str) -> Result<GraphDocument> {
    let record = parse_record(content)?;
    match detect_format(&record) {
        Some(DocumentFormat::Record) => GraphDocument::from_record(&record),
        Some(DocumentFormat::Typed) => Ok(serde_json::from_str(content)?),
        None => Err(Error::UnknownFormat),
    }
}

/// Read only the load tag of a document in either format
///
/// Nothing else is checked, so a document with missing or broken node
/// fields still reports its tag. A missing tag reads as empty.
///
/// # Errors
/// Returns an error if the text is not a JSON object or the tag is not a
/// string.
pub fn peek_load_tag(content: &str) -> Result<String> {
    let record = parse_record(content)?;
    let key = match detect_format(&record) {
        Some(DocumentFormat::Typed) => "load_tag",
        _ => "loadTag",
    };
    Ok(record.opt_str(key)?.unwrap_or_default().to_string())
}

/// Read a dialogue document in either format from disk
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_graph_document<P: AsRef<Path>>(path: P) -> Result<GraphDocument> {
    let content = fs::read_to_string(path)?;
    parse_graph_document(&content)
}

/// Serialize a dialogue document in the requested format
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn serialize_graph_document(doc: &GraphDocument, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Record => serialize_record(&doc.to_record()),
        DocumentFormat::Typed => Ok(serde_json::to_string_pretty(doc)?),
    }
}
