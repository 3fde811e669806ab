//! Record document structures
//!
//! A record document is a single flat JSON object. Every node field is stored
//! under its own indexed key (`nd_text_3`, `pd_0_com_1oAns`, ...), so the
//! document is modelled as an ordered map of keys to loosely typed values.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// A single value in a record document.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// Integral JSON number.
    Int(i64),
    /// Real JSON number.
    Float(f64),
    /// JSON string.
    Str(String),
    /// Arrays and nested objects. Never produced by the dialogue editor,
    /// kept so unknown fields survive a read/write cycle.
    Other(Value),
}

impl RecordValue {
    /// Name of the value kind, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RecordValue::Null => "null",
            RecordValue::Bool(_) => "bool",
            RecordValue::Int(_) => "integer",
            RecordValue::Float(_) => "float",
            RecordValue::Str(_) => "string",
            RecordValue::Other(Value::Array(_)) => "array",
            RecordValue::Other(_) => "object",
        }
    }

    fn from_json(value: Value) -> Self {
        match value {
            Value::Null => RecordValue::Null,
            Value::Bool(b) => RecordValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RecordValue::Int(i),
                None => RecordValue::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => RecordValue::Str(s),
            other => RecordValue::Other(other),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            RecordValue::Null => Value::Null,
            RecordValue::Bool(b) => Value::Bool(*b),
            RecordValue::Int(i) => Value::from(*i),
            RecordValue::Float(f) => Value::from(*f),
            RecordValue::Str(s) => Value::String(s.clone()),
            RecordValue::Other(v) => v.clone(),
        }
    }
}

impl From<bool> for RecordValue {
    fn from(value: bool) -> Self {
        RecordValue::Bool(value)
    }
}

impl From<i64> for RecordValue {
    fn from(value: i64) -> Self {
        RecordValue::Int(value)
    }
}

impl From<i32> for RecordValue {
    fn from(value: i32) -> Self {
        RecordValue::Int(i64::from(value))
    }
}

impl From<f32> for RecordValue {
    fn from(value: f32) -> Self {
        RecordValue::Float(f64::from(value))
    }
}

impl From<&str> for RecordValue {
    fn from(value: &str) -> Self {
        RecordValue::Str(value.to_string())
    }
}

impl From<String> for RecordValue {
    fn from(value: String) -> Self {
        RecordValue::Str(value)
    }
}

/// A decoded record document: named fields with typed values, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDocument {
    fields: IndexMap<String, RecordValue>,
}

impl RecordDocument {
    /// Create an empty document
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a field is present
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Raw value lookup
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.fields.get(key)
    }

    /// Set a field, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RecordValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Iterate fields in document order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn require(&self, key: &str) -> Result<&RecordValue> {
        self.fields
            .get(key)
            .ok_or_else(|| Error::MissingField(key.to_string()))
    }

    fn type_error(key: &str, expected: &'static str, found: &RecordValue) -> Error {
        Error::FieldType {
            key: key.to_string(),
            expected,
            found: found.kind(),
        }
    }

    /// Required integer field.
    pub fn int(&self, key: &str) -> Result<i64> {
        match self.require(key)? {
            RecordValue::Int(i) => Ok(*i),
            other => Err(Self::type_error(key, "integer", other)),
        }
    }

    /// Optional integer field. Absent or `null` yields `None`.
    pub fn opt_int(&self, key: &str) -> Result<Option<i64>> {
        match self.fields.get(key) {
            None | Some(RecordValue::Null) => Ok(None),
            Some(RecordValue::Int(i)) => Ok(Some(*i)),
            Some(other) => Err(Self::type_error(key, "integer", other)),
        }
    }

    /// Required string field.
    pub fn str(&self, key: &str) -> Result<&str> {
        match self.require(key)? {
            RecordValue::Str(s) => Ok(s),
            other => Err(Self::type_error(key, "string", other)),
        }
    }

    /// Optional string field. Absent or `null` yields `None`.
    pub fn opt_str(&self, key: &str) -> Result<Option<&str>> {
        match self.fields.get(key) {
            None | Some(RecordValue::Null) => Ok(None),
            Some(RecordValue::Str(s)) => Ok(Some(s)),
            Some(other) => Err(Self::type_error(key, "string", other)),
        }
    }

    /// Required boolean field.
    pub fn bool(&self, key: &str) -> Result<bool> {
        match self.require(key)? {
            RecordValue::Bool(b) => Ok(*b),
            other => Err(Self::type_error(key, "bool", other)),
        }
    }

    /// Required float field.
    ///
    /// The editor writes whole-number floats without a fractional part, so
    /// integral encodings are accepted and widened.
    pub fn float(&self, key: &str) -> Result<f32> {
        match self.require(key)? {
            RecordValue::Float(f) => Ok(*f as f32),
            RecordValue::Int(i) => Ok(*i as f32),
            other => Err(Self::type_error(key, "number", other)),
        }
    }
}

impl Serialize for RecordDocument {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, &value.to_json())?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RecordDocument {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // IndexMap keeps the editor's key order for diff-friendly rewrites
        let map: IndexMap<String, Value> = IndexMap::deserialize(deserializer)?;
        let fields = map
            .into_iter()
            .map(|(key, value)| (key, RecordValue::from_json(value)))
            .collect();
        Ok(RecordDocument { fields })
    }
}
