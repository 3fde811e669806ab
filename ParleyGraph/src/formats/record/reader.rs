//! Record file reading

use super::document::RecordDocument;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Read a record document from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON object.
pub fn read_record<P: AsRef<Path>>(path: P) -> Result<RecordDocument> {
    let content = fs::read_to_string(path)?;
    parse_record(&content)
}

/// Parse a record document from a JSON string
///
/// # Errors
/// Returns an error if the JSON is malformed or its top level is not an object.
pub fn parse_record(content: &str) -> Result<RecordDocument> {
    let value: Value = serde_json::from_str(content)?;
    let found = match &value {
        Value::Object(_) => None,
        Value::Array(_) => Some("array"),
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("bool"),
        Value::Null => Some("null"),
    };
    if let Some(found) = found {
        return Err(Error::NotAnObject { found });
    }
    let doc: RecordDocument = serde_json::from_value(value)?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(matches!(parse_record("[1, 2]"), Err(Error::NotAnObject { found: "array" })));
        assert!(matches!(parse_record("{ nope"), Err(Error::JsonError(_))));
    }

    #[test]
    fn test_parse_object() {
        let doc = parse_record(r#"{"startPoint": 4}"#).unwrap();
        assert_eq!(doc.int("startPoint").unwrap(), 4);
    }
}
