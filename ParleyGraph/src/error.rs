//! Error types for `ParleyGraph`

use thiserror::Error;

/// The error type for `ParleyGraph` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    // ==================== Source Errors ====================
    /// No document with this name exists in the dialogue source.
    #[error("dialogue document not found: {0}")]
    DocumentNotFound(String),

    // ==================== Record Document Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The top-level JSON value is not an object.
    #[error("record document must be a JSON object, found {found}")]
    NotAnObject {
        /// The JSON kind that was found instead.
        found: &'static str,
    },

    /// A required field is absent from the record document.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A field is present but holds the wrong kind of value.
    #[error("field '{key}' should be {expected}, found {found}")]
    FieldType {
        /// The record key.
        key: String,
        /// The expected value kind.
        expected: &'static str,
        /// The value kind that was found.
        found: &'static str,
    },

    /// A count or ID does not fit the model's integer range.
    #[error("field '{key}' is out of range: {value}")]
    OutOfRange {
        /// The record key.
        key: String,
        /// The offending value.
        value: i64,
    },

    /// Unknown action parameter kind.
    #[error("invalid parameter kind {kind} on action {action} (expected 0-4)")]
    InvalidParamKind {
        /// Index of the action in the document.
        action: usize,
        /// The kind value found.
        kind: i64,
    },

    /// A reference index is negative but not the `-1` sentinel.
    #[error("field '{key}' holds invalid index {value}")]
    InvalidIndex {
        /// The record key.
        key: String,
        /// The offending value.
        value: i64,
    },

    /// The document matches neither the record format nor the typed schema.
    #[error("unrecognised dialogue document format")]
    UnknownFormat,

    // ==================== Graph Errors ====================
    /// A reference index points past the end of its node list.
    #[error("{from} links to {kind} #{index}, but only {count} exist")]
    DanglingLink {
        /// Human-readable location of the link (e.g. "npc line #2").
        from: String,
        /// The kind of node referenced.
        kind: &'static str,
        /// The referenced index.
        index: usize,
        /// Number of nodes of that kind.
        count: usize,
    },
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

/// A specialized Result type for `ParleyGraph` operations.
pub type Result<T> = std::result::Result<T, Error>;
