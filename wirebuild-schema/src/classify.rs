//! Attribute classification.
//!
//! Every stored field is encoded with one of four strategies. The generator
//! and the reference codec both dispatch on [`AttributeKind`] with exhaustive
//! matches, so a new kind cannot be added without handling it everywhere.

use crate::error::SchemaError;
use crate::types::{AttributeDescriptor, BYTE_TYPE, Schema, SizeSpec, TypeDescriptor, TypeKind};

/// Suffix of a size-source name that makes the dependent a repeated collection.
pub const COUNT_SUFFIX: &str = "Count";

/// Suffix of a size-source name that makes the dependent a byte buffer.
pub const SIZE_SUFFIX: &str = "Size";

/// Integer widths a Simple field may have.
pub const SIMPLE_WIDTHS: [u64; 4] = [1, 2, 4, 8];

/// Encoding strategy of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Fixed-width integer of 1, 2, 4 or 8 bytes.
    Simple,
    /// Raw byte buffer of fixed or sibling-supplied length.
    Buffer,
    /// Repeated elements, count supplied by a sibling.
    Array,
    /// Delegates to a generated struct or enum.
    Custom,
}

/// Returns true if `width` is a supported integer width.
#[must_use]
pub fn is_simple_width(width: u64) -> bool {
    SIMPLE_WIDTHS.contains(&width)
}

/// Returns true if the type name is the built-in byte type.
#[must_use]
pub fn is_byte_type(type_name: &str) -> bool {
    type_name == BYTE_TYPE
}

/// Resolves the descriptor an attribute references. `byte` has no descriptor.
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` for names absent from the schema.
pub fn referenced_type<'a>(
    schema: &'a Schema,
    attribute: &AttributeDescriptor,
) -> Result<Option<&'a TypeDescriptor>, SchemaError> {
    if is_byte_type(&attribute.type_name) {
        return Ok(None);
    }
    schema
        .get_type(&attribute.type_name)
        .map(Some)
        .ok_or_else(|| SchemaError::type_not_found(&attribute.type_name, &attribute.name))
}

/// Classifies an attribute into its encoding strategy.
///
/// # Arguments
/// * `schema` - Schema used to resolve the referenced type
/// * `attribute` - Attribute to classify
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` if the attribute references an
/// unknown type.
pub fn classify(
    schema: &Schema,
    attribute: &AttributeDescriptor,
) -> Result<AttributeKind, SchemaError> {
    let descriptor = referenced_type(schema, attribute)?;
    let composite = descriptor.is_some_and(|d| matches!(d.kind, TypeKind::Struct | TypeKind::Enum));

    match &attribute.size {
        None => match descriptor {
            None => Ok(AttributeKind::Simple),
            Some(_) if composite => Ok(AttributeKind::Custom),
            Some(d) => Ok(classify_fixed(d.size.unwrap_or(1))),
        },
        Some(SizeSpec::Fixed(_)) if composite => Ok(AttributeKind::Custom),
        Some(SizeSpec::Field(source)) => Ok(classify_size_source(source)),
        Some(SizeSpec::Fixed(n)) => Ok(classify_fixed(*n)),
    }
}

/// Classification of a field sized by a sibling: `...Count` is an Array,
/// `...Size` and everything else a Buffer.
#[must_use]
pub fn classify_size_source(source: &str) -> AttributeKind {
    if source.ends_with(COUNT_SUFFIX) {
        AttributeKind::Array
    } else {
        AttributeKind::Buffer
    }
}

/// Byte-family types (`byte` and primitive aliases) with an integer width.
fn classify_fixed(size: u64) -> AttributeKind {
    if is_simple_width(size) {
        AttributeKind::Simple
    } else {
        AttributeKind::Buffer
    }
}

/// Element of an Array field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind<'a> {
    /// Integer element of the given width; `byte` elements have width 1.
    Integer(u64),
    /// Struct or enum element, delegated to the element type.
    Composite(&'a TypeDescriptor),
}

/// Resolves the element of an Array field from its declared type.
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` for unknown types and
/// `SchemaError::UnsupportedElement` for primitive aliases that are not
/// 1, 2, 4 or 8 bytes wide.
pub fn array_element<'a>(
    schema: &'a Schema,
    attribute: &AttributeDescriptor,
) -> Result<ElementKind<'a>, SchemaError> {
    match referenced_type(schema, attribute)? {
        None => Ok(ElementKind::Integer(1)),
        Some(d) if d.is_primitive() => {
            let width = d.size.unwrap_or(1);
            if is_simple_width(width) {
                Ok(ElementKind::Integer(width))
            } else {
                Err(SchemaError::UnsupportedElement {
                    field: attribute.name.clone(),
                    type_name: d.name.clone(),
                })
            }
        }
        Some(d) => Ok(ElementKind::Composite(d)),
    }
}

/// Effective size of an attribute: the explicit size if given, otherwise the
/// referenced descriptor's size, otherwise 1.
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` if the attribute references an
/// unknown type.
pub fn attribute_size(
    schema: &Schema,
    attribute: &AttributeDescriptor,
) -> Result<SizeSpec, SchemaError> {
    if let Some(size) = &attribute.size {
        return Ok(size.clone());
    }
    let size = referenced_type(schema, attribute)?
        .and_then(|d| d.size)
        .unwrap_or(1);
    Ok(SizeSpec::Fixed(size))
}

/// Fixed width of an attribute, for Simple fields and size sources. String
/// sizes resolve to `None`.
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` if the attribute references an
/// unknown type.
pub fn fixed_width(
    schema: &Schema,
    attribute: &AttributeDescriptor,
) -> Result<Option<u64>, SchemaError> {
    Ok(attribute_size(schema, attribute)?.fixed())
}
