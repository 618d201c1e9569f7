//! Dynamic values mirroring the shape of generated types.
//!
//! A decoded struct is a [`Record`] keyed by field name. Derived size-source
//! fields never appear in a record: their values only exist on the wire.

use std::collections::HashMap;

/// A single decoded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Fixed-width integer (Simple fields, raw byte array elements).
    Int(u64),
    /// Raw byte buffer (Buffer fields).
    Bytes(Vec<u8>),
    /// Ordered collection (Array fields).
    List(Vec<Value>),
    /// Struct instance (Custom fields of struct type).
    Record(Record),
    /// Enum member, by name (Custom fields of enum type).
    Enum(String),
}

impl Value {
    /// Creates an enum member value.
    pub fn member(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<u64> {
        match self {
            Self::Int(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the bytes, if this is a buffer value.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements, if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the record, if this is a struct value.
    #[must_use]
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the member name, if this is an enum value.
    #[must_use]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(name) => Some(name),
            _ => None,
        }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Self::Record(record)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<u64> for Value {
    fn from(x: u64) -> Self {
        Self::Int(x)
    }
}

/// Stored fields of one struct instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Stores a field without any validation.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Returns a stored field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Removes a stored field.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    /// Returns true if the field is stored.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of stored fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = Record::new()
            .with("kind", Value::member("A"))
            .with("payload", vec![1u8, 2, 3]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("kind").and_then(Value::as_enum), Some("A"));
        assert_eq!(
            record.get("payload").and_then(Value::as_bytes),
            Some(&[1u8, 2, 3][..])
        );
        assert!(!record.contains("len"));
    }

    #[test]
    fn test_value_accessors_reject_other_shapes() {
        let v = Value::Int(5);
        assert_eq!(v.as_int(), Some(5));
        assert!(v.as_bytes().is_none());
        assert!(v.as_list().is_none());
        assert!(v.as_record().is_none());
        assert!(v.as_enum().is_none());
    }
}
