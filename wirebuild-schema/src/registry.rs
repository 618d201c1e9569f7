//! Enum membership accumulated over one generation run.
//!
//! An enum's members are the values declared in the schema followed by the
//! literals that `const` attributes contribute while structs are resolved.
//! The registry is an explicit value owned by a single run; once the struct
//! pass is over it is consumed into a read-only [`EnumTable`].

use crate::classify::{is_byte_type, is_simple_width};
use crate::error::SchemaError;
use crate::types::{AttributeDescriptor, EnumValue, Schema, SizeSpec, TypeDescriptor, TypeKind};
use std::collections::HashMap;

/// Accumulated members of one enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    /// Enum type name.
    pub name: String,
    /// Backing width in bytes (1, 2, 4 or 8).
    pub width: u64,
    /// Whether the enum is declared as a schema type.
    pub declared: bool,
    /// Members in emission order: declared first, then contributed.
    pub members: Vec<EnumValue>,
}

impl EnumEntry {
    fn new(name: &str, width: u64, declared: bool) -> Result<Self, SchemaError> {
        if !is_simple_width(width) {
            return Err(SchemaError::UnsupportedEnumWidth {
                enum_name: name.to_string(),
                size: width,
            });
        }
        Ok(Self {
            name: name.to_string(),
            width,
            declared,
            members: Vec::new(),
        })
    }

    fn push(&mut self, member: EnumValue) -> Result<(), SchemaError> {
        let upper = member.name.to_uppercase();
        if self.members.iter().any(|m| m.name.to_uppercase() == upper) {
            return Err(SchemaError::DuplicateEnumMember {
                enum_name: self.name.clone(),
                member: upper,
            });
        }
        self.members.push(member);
        Ok(())
    }

    /// Finds the first member with the given backing value. Values are
    /// compared at the enum's width.
    #[must_use]
    pub fn find_by_value(&self, value: u64) -> Option<&EnumValue> {
        let mask = width_mask(self.width);
        self.members.iter().find(|m| m.value & mask == value & mask)
    }

    /// Finds a member by name, ignoring case.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&EnumValue> {
        let upper = name.to_uppercase();
        self.members.iter().find(|m| m.name.to_uppercase() == upper)
    }
}

fn width_mask(width: u64) -> u64 {
    if width >= 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    }
}

/// Mutable enum table used during the struct pass.
#[derive(Debug, Clone, Default)]
pub struct EnumRegistry {
    entries: Vec<EnumEntry>,
    index: HashMap<String, usize>,
}

impl EnumRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every enum declared in the schema, in
    /// declaration order, with its declared values.
    ///
    /// # Errors
    /// Returns `SchemaError::UnsupportedEnumWidth` or
    /// `SchemaError::DuplicateEnumMember` for malformed enum declarations.
    pub fn seed(schema: &Schema) -> Result<Self, SchemaError> {
        let mut registry = Self::new();
        for descriptor in schema.iter().filter(|d| d.kind == TypeKind::Enum) {
            registry.insert_declared(descriptor)?;
        }
        Ok(registry)
    }

    fn insert_declared(&mut self, descriptor: &TypeDescriptor) -> Result<usize, SchemaError> {
        let mut entry = EnumEntry::new(&descriptor.name, descriptor.size.unwrap_or(1), true)?;
        for value in &descriptor.values {
            entry.push(value.clone())?;
        }
        Ok(self.insert(entry))
    }

    fn insert(&mut self, entry: EnumEntry) -> usize {
        let idx = self.entries.len();
        self.index.insert(entry.name.clone(), idx);
        self.entries.push(entry);
        idx
    }

    /// Records the literal of a `const` attribute as member `owner` of the
    /// enum the attribute references.
    ///
    /// Consts typed `byte` or with a non-enum schema type carry no enum
    /// membership and are skipped. Enums missing from the schema are created
    /// on first reference; the attribute must then carry an integer `size`
    /// for the backing width.
    ///
    /// # Errors
    /// Returns `SchemaError::InvalidConst` if an enum-targeting attribute has
    /// no value, `SchemaError::TypeNotFound` if an undeclared enum has no
    /// width, and `SchemaError::DuplicateEnumMember` if `owner` already names
    /// a member of the enum.
    pub fn contribute(
        &mut self,
        schema: &Schema,
        attribute: &AttributeDescriptor,
        owner: &str,
    ) -> Result<(), SchemaError> {
        let enum_name = attribute.type_name.as_str();

        let idx = match (self.index.get(enum_name), schema.get_type(enum_name)) {
            (Some(&idx), _) => idx,
            (None, Some(descriptor)) if descriptor.kind == TypeKind::Enum => {
                self.insert_declared(descriptor)?
            }
            (None, Some(_)) => {
                tracing::debug!(
                    field = %attribute.name,
                    type_name = enum_name,
                    "const of non-enum type skipped"
                );
                return Ok(());
            }
            (None, None) if is_byte_type(enum_name) => {
                tracing::debug!(field = %attribute.name, "const of byte type skipped");
                return Ok(());
            }
            (None, None) => {
                let width = attribute
                    .size
                    .as_ref()
                    .and_then(SizeSpec::fixed)
                    .ok_or_else(|| SchemaError::type_not_found(enum_name, &attribute.name))?;
                self.insert(EnumEntry::new(enum_name, width, false)?)
            }
        };

        let value = attribute.value.ok_or_else(|| SchemaError::InvalidConst {
            field: attribute.name.clone(),
            message: "missing value".to_string(),
        })?;
        self.entries[idx].push(EnumValue::new(owner, value))
    }

    /// Looks up an enum by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnumEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Ends the accumulation phase.
    #[must_use]
    pub fn finish(self) -> EnumTable {
        EnumTable {
            entries: self.entries,
            index: self.index,
        }
    }
}

/// Read-only enum membership after every struct was resolved.
#[derive(Debug, Clone, Default)]
pub struct EnumTable {
    entries: Vec<EnumEntry>,
    index: HashMap<String, usize>,
}

impl EnumTable {
    /// Looks up an enum by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&EnumEntry> {
        self.index.get(name).map(|&idx| &self.entries[idx])
    }

    /// Iterates enums: declared enums in schema order, then enums created
    /// by contributions in order of first reference.
    pub fn iter(&self) -> impl Iterator<Item = &EnumEntry> {
        self.entries.iter()
    }

    /// Number of enums.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table holds no enum.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeDescriptor;

    fn schema() -> Schema {
        vec![
            TypeDescriptor::enumeration(
                "EntityType",
                2,
                vec![EnumValue::new("reserved", 0)],
            ),
            TypeDescriptor::structure("Other", Vec::new()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_seed_keeps_declared_values() {
        let registry = EnumRegistry::seed(&schema()).expect("seed");
        let entry = registry.get("EntityType").expect("entry");
        assert!(entry.declared);
        assert_eq!(entry.width, 2);
        assert_eq!(entry.members, vec![EnumValue::new("reserved", 0)]);
    }

    #[test]
    fn test_contributions_append_after_declared() {
        let schema = schema();
        let mut registry = EnumRegistry::seed(&schema).expect("seed");
        let s1 = AttributeDescriptor::constant("entityType", "EntityType", 5);
        let s2 = AttributeDescriptor::constant("entityType", "EntityType", 9);
        registry.contribute(&schema, &s1, "S1Builder").expect("s1");
        registry.contribute(&schema, &s2, "S2Builder").expect("s2");

        let table = registry.finish();
        let names: Vec<(&str, u64)> = table
            .get("EntityType")
            .expect("entry")
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.value))
            .collect();
        assert_eq!(names, vec![("reserved", 0), ("S1Builder", 5), ("S2Builder", 9)]);
    }

    #[test]
    fn test_duplicate_member_is_rejected() {
        let schema = schema();
        let mut registry = EnumRegistry::seed(&schema).expect("seed");
        let attr = AttributeDescriptor::constant("entityType", "EntityType", 5);
        registry.contribute(&schema, &attr, "Reserved").expect_err("clash with declared");
        registry.contribute(&schema, &attr, "S1").expect("first");
        let err = registry.contribute(&schema, &attr, "s1").expect_err("clash");
        assert!(matches!(
            err,
            SchemaError::DuplicateEnumMember { ref member, .. } if member == "S1"
        ));
    }

    #[test]
    fn test_unsupported_width() {
        let schema: Schema = vec![TypeDescriptor::enumeration("Wide", 3, Vec::new())]
            .into_iter()
            .collect();
        let err = EnumRegistry::seed(&schema).expect_err("should fail");
        assert!(matches!(err, SchemaError::UnsupportedEnumWidth { size: 3, .. }));
    }

    #[test]
    fn test_undeclared_enum_created_lazily() {
        let schema = schema();
        let mut registry = EnumRegistry::seed(&schema).expect("seed");
        let attr = AttributeDescriptor::constant("facility", "Facility", 7).with_size(1u64);
        registry.contribute(&schema, &attr, "Owner").expect("contribute");
        let table = registry.finish();
        let entry = table.get("Facility").expect("entry");
        assert!(!entry.declared);
        let names: Vec<&str> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EntityType", "Facility"]);
    }

    #[test]
    fn test_undeclared_enum_without_width() {
        let schema = schema();
        let mut registry = EnumRegistry::new();
        let attr = AttributeDescriptor::constant("facility", "Facility", 7);
        let err = registry.contribute(&schema, &attr, "Owner").expect_err("should fail");
        assert!(matches!(err, SchemaError::TypeNotFound { .. }));
    }

    #[test]
    fn test_const_on_non_enum_is_skipped() {
        let mut schema = schema();
        schema.add_type(TypeDescriptor::primitive("Amount", 8));
        let mut registry = EnumRegistry::seed(&schema).expect("seed");

        let on_struct = AttributeDescriptor::constant("x", "Other", 1);
        let on_alias = AttributeDescriptor::constant("MIN_FEE", "Amount", 10);
        let on_byte =
            AttributeDescriptor::constant("TRANSACTION_VERSION", "byte", 1).with_size(1u64);
        for attr in [&on_struct, &on_alias, &on_byte] {
            registry.contribute(&schema, attr, "Owner").expect("skipped");
        }

        let table = registry.finish();
        let names: Vec<&str> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["EntityType"]);
        assert_eq!(table.get("EntityType").expect("entry").members.len(), 1);
    }

    #[test]
    fn test_declared_enum_added_without_seed() {
        let schema = schema();
        let mut registry = EnumRegistry::new();
        let attr = AttributeDescriptor::constant("entityType", "EntityType", 5);
        registry.contribute(&schema, &attr, "S1Builder").expect("contribute");
        let entry = registry.get("EntityType").expect("entry");
        assert!(entry.declared);
        assert_eq!(entry.members.len(), 2);
    }

    #[test]
    fn test_find_by_value_masks_width() {
        let mut entry = EnumEntry::new("E", 1, true).expect("entry");
        entry.push(EnumValue::new("a", 0x1ff)).expect("push");
        assert_eq!(entry.find_by_value(0xff).map(|m| m.name.as_str()), Some("a"));
        assert!(entry.find_by_value(0x01).is_none());
        assert_eq!(entry.find_by_name("A").map(|m| m.value), Some(0x1ff));
    }
}
