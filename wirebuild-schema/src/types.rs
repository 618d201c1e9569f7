//! Schema type definitions.
//!
//! This module contains the data structures of the layout schema: type
//! descriptors (primitive, struct, enum), the attributes of a struct layout
//! and enum values. Everything here is immutable once loaded.

use serde::Deserialize;
use std::collections::HashMap;

/// Name of the built-in byte type every primitive is made of.
pub const BYTE_TYPE: &str = "byte";

/// Complete layout schema: type descriptors in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Type descriptors, in declaration order.
    pub types: Vec<TypeDescriptor>,
    /// Type lookup map (name to index in `types`).
    type_map: HashMap<String, usize>,
}

impl Schema {
    /// Creates a new empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a type descriptor to the schema. A later descriptor with the same
    /// name shadows the earlier one for lookups.
    pub fn add_type(&mut self, descriptor: TypeDescriptor) {
        let name = descriptor.name.clone();
        let index = self.types.len();
        self.types.push(descriptor);
        self.type_map.insert(name, index);
    }

    /// Looks up a type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDescriptor> {
        self.type_map.get(name).map(|&idx| &self.types[idx])
    }

    /// Returns true if a type with the given name exists.
    #[must_use]
    pub fn has_type(&self, name: &str) -> bool {
        self.type_map.contains_key(name)
    }

    /// Iterates type descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.iter()
    }

    /// Number of type descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if the schema declares no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDescriptor> for Schema {
    fn from_iter<I: IntoIterator<Item = TypeDescriptor>>(iter: I) -> Self {
        let mut schema = Self::new();
        for descriptor in iter {
            schema.add_type(descriptor);
        }
        schema
    }
}

/// Kind of a type descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum TypeKind {
    /// Byte-family primitive (an alias of `byte` with a width).
    #[serde(rename = "byte")]
    Primitive,
    /// Struct with an ordered layout.
    #[serde(rename = "struct")]
    Struct,
    /// Enum with named integer values.
    #[serde(rename = "enum")]
    Enum,
}

/// Type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypeDescriptor {
    /// Type name (the key of the schema mapping).
    #[serde(skip)]
    pub name: String,
    /// Type kind.
    #[serde(rename = "type")]
    pub kind: TypeKind,
    /// Declared size in bytes (primitive width or enum backing width).
    #[serde(default)]
    pub size: Option<u64>,
    /// Struct layout.
    #[serde(default)]
    pub layout: Vec<AttributeDescriptor>,
    /// Enum values.
    #[serde(default)]
    pub values: Vec<EnumValue>,
}

impl TypeDescriptor {
    /// Creates a primitive descriptor of the given width.
    #[must_use]
    pub fn primitive(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Primitive,
            size: Some(size),
            layout: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Creates a struct descriptor.
    #[must_use]
    pub fn structure(name: impl Into<String>, layout: Vec<AttributeDescriptor>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Struct,
            size: None,
            layout,
            values: Vec::new(),
        }
    }

    /// Creates an enum descriptor with the given backing width.
    #[must_use]
    pub fn enumeration(name: impl Into<String>, size: u64, values: Vec<EnumValue>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Enum,
            size: Some(size),
            layout: Vec::new(),
            values,
        }
    }

    /// Returns true if this is a struct.
    #[must_use]
    pub const fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct)
    }

    /// Returns true if this is an enum.
    #[must_use]
    pub const fn is_enum(&self) -> bool {
        matches!(self.kind, TypeKind::Enum)
    }

    /// Returns true if this is a byte-family primitive.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive)
    }
}

/// Size of an attribute: a fixed byte count or a sibling field's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(untagged)]
pub enum SizeSpec {
    /// Fixed size in bytes.
    Fixed(u64),
    /// Name of the sibling field holding the length or count.
    Field(String),
}

impl SizeSpec {
    /// Returns the fixed size, if any.
    #[must_use]
    pub fn fixed(&self) -> Option<u64> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Field(_) => None,
        }
    }

    /// Returns the size-source field name, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Fixed(_) => None,
            Self::Field(name) => Some(name),
        }
    }
}

impl From<u64> for SizeSpec {
    fn from(n: u64) -> Self {
        Self::Fixed(n)
    }
}

impl From<&str> for SizeSpec {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

/// How an attribute participates in its struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    /// The referenced struct's fields are spliced in place.
    Inline,
    /// Contributes a literal to the referenced enum; never stored or streamed.
    Const,
}

/// One entry of a struct layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttributeDescriptor {
    /// Field name.
    #[serde(default)]
    pub name: String,
    /// Referenced type name (`byte` or a schema type).
    #[serde(rename = "type")]
    pub type_name: String,
    /// Explicit size.
    #[serde(default)]
    pub size: Option<SizeSpec>,
    /// Disposition.
    #[serde(default)]
    pub disposition: Option<Disposition>,
    /// Name of the guard field gating this field's presence.
    #[serde(default)]
    pub condition: Option<String>,
    /// Guard value under which this field is present.
    #[serde(default)]
    pub condition_value: Option<String>,
    /// Literal contributed by a const attribute.
    #[serde(default)]
    pub value: Option<u64>,
}

impl AttributeDescriptor {
    /// Creates a plain attribute.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            size: None,
            disposition: None,
            condition: None,
            condition_value: None,
            value: None,
        }
    }

    /// Creates an inline attribute splicing `type_name`'s layout.
    #[must_use]
    pub fn inline(type_name: impl Into<String>) -> Self {
        let mut attr = Self::new("", type_name);
        attr.disposition = Some(Disposition::Inline);
        attr
    }

    /// Creates a const attribute contributing `value` to the enum `type_name`.
    #[must_use]
    pub fn constant(name: impl Into<String>, type_name: impl Into<String>, value: u64) -> Self {
        let mut attr = Self::new(name, type_name);
        attr.disposition = Some(Disposition::Const);
        attr.value = Some(value);
        attr
    }

    /// Builder-style size setter.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<SizeSpec>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// Builder-style condition setter.
    #[must_use]
    pub fn with_condition(
        mut self,
        condition: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.condition = Some(condition.into());
        self.condition_value = Some(value.into());
        self
    }

    /// Returns true if this attribute is spliced inline.
    #[must_use]
    pub fn is_inline(&self) -> bool {
        self.disposition == Some(Disposition::Inline)
    }

    /// Returns true if this attribute is a const contribution.
    #[must_use]
    pub fn is_const(&self) -> bool {
        self.disposition == Some(Disposition::Const)
    }

    /// Returns the size-source field name, if the size is a field reference.
    #[must_use]
    pub fn size_field(&self) -> Option<&str> {
        self.size.as_ref().and_then(SizeSpec::field)
    }
}

/// Named enum value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Backing integer.
    pub value: u64,
}

impl EnumValue {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_type_lookup() {
        let mut schema = Schema::new();
        schema.add_type(TypeDescriptor::primitive("Amount", 8));

        assert!(schema.has_type("Amount"));
        assert!(!schema.has_type("unknown"));
        assert_eq!(schema.get_type("Amount").and_then(|t| t.size), Some(8));
        assert_eq!(schema.len(), 1);
    }

    #[test]
    fn test_schema_preserves_declaration_order() {
        let schema: Schema = vec![
            TypeDescriptor::primitive("Zeta", 1),
            TypeDescriptor::structure("Alpha", Vec::new()),
            TypeDescriptor::enumeration("Mid", 1, Vec::new()),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = schema.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_attribute_builders() {
        let attr = AttributeDescriptor::new("payload", BYTE_TYPE).with_size("payloadSize");
        assert_eq!(attr.size_field(), Some("payloadSize"));
        assert!(!attr.is_inline());

        let inline = AttributeDescriptor::inline("EntityBody");
        assert!(inline.is_inline());

        let constant = AttributeDescriptor::constant("entityType", "EntityType", 0x4154);
        assert!(constant.is_const());
        assert_eq!(constant.value, Some(0x4154));
    }

    #[test]
    fn test_size_spec_deserialize_untagged() {
        let fixed: SizeSpec = serde_json::from_str("4").expect("Failed to parse");
        assert_eq!(fixed, SizeSpec::Fixed(4));
        let field: SizeSpec = serde_json::from_str("\"mosaicsCount\"").expect("Failed to parse");
        assert_eq!(field.field(), Some("mosaicsCount"));
    }

    #[test]
    fn test_type_kind_predicates() {
        assert!(TypeDescriptor::structure("S", Vec::new()).is_struct());
        assert!(TypeDescriptor::enumeration("E", 1, Vec::new()).is_enum());
        assert!(TypeDescriptor::primitive("P", 2).is_primitive());
    }
}
