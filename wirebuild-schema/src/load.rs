//! JSON schema loading.
//!
//! A schema document is a JSON object mapping type names to descriptors.
//! Generation order is the document order, so the object is read entry by
//! entry instead of through a hash map.

use crate::error::ParseError;
use crate::types::{Schema, TypeDescriptor};
use serde::Deserialize;
use serde::de::{Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::Path;

/// Parses a schema from a JSON string.
///
/// # Arguments
/// * `json` - JSON object mapping type names to descriptors
///
/// # Returns
/// The schema, with types in document order.
///
/// # Errors
/// Returns `ParseError::Json` if the document is malformed or a descriptor
/// has the wrong shape.
pub fn from_json_str(json: &str) -> Result<Schema, ParseError> {
    let schema: Schema = serde_json::from_str(json)?;
    tracing::debug!(types = schema.len(), "loaded schema");
    Ok(schema)
}

/// Reads and parses a schema file.
///
/// # Arguments
/// * `path` - Path to the JSON schema file
///
/// # Errors
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::Json` if it does not parse.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Schema, ParseError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading schema file");
    let json = std::fs::read_to_string(path)?;
    from_json_str(&json)
}

struct SchemaVisitor;

impl<'de> Visitor<'de> for SchemaVisitor {
    type Value = Schema;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of type names to type descriptors")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Schema, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut schema = Schema::new();
        while let Some((name, mut descriptor)) = map.next_entry::<String, TypeDescriptor>()? {
            descriptor.name = name;
            schema.add_type(descriptor);
        }
        Ok(schema)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SchemaVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Disposition, SizeSpec, TypeKind};
    use std::io::Write;

    const CATALOG: &str = r#"{
        "Kind": {"type": "enum", "size": 1, "values": [{"name": "a", "value": 1}]},
        "Amount": {"type": "byte", "size": 8},
        "HeaderBody": {"type": "struct", "layout": [
            {"name": "kind", "type": "Kind"}
        ]},
        "Msg": {"type": "struct", "layout": [
            {"disposition": "inline", "type": "HeaderBody"},
            {"name": "len", "type": "byte", "size": 4},
            {"name": "payload", "type": "byte", "size": "len"},
            {"name": "fee", "type": "Amount", "condition": "kind", "condition_value": "a"},
            {"name": "entityType", "type": "Kind", "disposition": "const", "value": 7}
        ]}
    }"#;

    #[test]
    fn test_load_preserves_document_order() {
        let schema = from_json_str(CATALOG).expect("Failed to parse");
        let names: Vec<&str> = schema.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Kind", "Amount", "HeaderBody", "Msg"]);
    }

    #[test]
    fn test_load_descriptor_shapes() {
        let schema = from_json_str(CATALOG).expect("Failed to parse");

        let kind = schema.get_type("Kind").expect("Kind");
        assert_eq!(kind.kind, TypeKind::Enum);
        assert_eq!(kind.values.len(), 1);

        let msg = schema.get_type("Msg").expect("Msg");
        assert_eq!(msg.layout[0].disposition, Some(Disposition::Inline));
        assert_eq!(msg.layout[1].size, Some(SizeSpec::Fixed(4)));
        assert_eq!(msg.layout[2].size_field(), Some("len"));
        assert_eq!(msg.layout[3].condition.as_deref(), Some("kind"));
        assert!(msg.layout[4].is_const());
        assert_eq!(msg.layout[4].value, Some(7));
    }

    #[test]
    fn test_load_rejects_unknown_kind() {
        let err = from_json_str(r#"{"X": {"type": "union"}}"#).expect_err("should fail");
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(CATALOG.as_bytes()).expect("write");
        let schema = from_json_file(file.path()).expect("Failed to parse");
        assert_eq!(schema.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = from_json_file("/nonexistent/schema.json").expect_err("should fail");
        assert!(matches!(err, ParseError::Io(_)));
    }
}
