//! Inline flattening.
//!
//! A struct's wire layout is its own layout with every inline attribute
//! replaced, depth-first, by the layout of the struct it references. Const
//! attributes vanish from the flattened list and are recorded in the enum
//! registry instead. Accessors, load and serialize all walk the same
//! flattened list, which is what keeps the wire order consistent.

use crate::classify::{
    AttributeKind, array_element, classify, classify_size_source, fixed_width, is_simple_width,
};
use crate::error::SchemaError;
use crate::registry::EnumRegistry;
use crate::types::{AttributeDescriptor, Schema, TypeDescriptor};

/// One stored or derived field of a flattened struct.
#[derive(Debug, Clone, Copy)]
pub struct FlatField<'a> {
    /// The attribute as declared.
    pub attribute: &'a AttributeDescriptor,
    /// Encoding strategy.
    pub kind: AttributeKind,
    /// The field whose length or count this one carries. A field with a
    /// dependent is a size source: it has no storage.
    pub dependent: Option<&'a AttributeDescriptor>,
    /// Width of a size source in bytes.
    pub width: Option<u64>,
}

impl<'a> FlatField<'a> {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.attribute.name
    }

    /// Returns true if the field is derived from its dependent.
    #[must_use]
    pub fn is_size_source(&self) -> bool {
        self.dependent.is_some()
    }

    /// Returns true if the dependent is a collection (its count is carried)
    /// rather than a buffer (its byte length is carried).
    #[must_use]
    pub fn counts_elements(&self) -> bool {
        self.dependent
            .and_then(AttributeDescriptor::size_field)
            .is_some_and(|source| classify_size_source(source) == AttributeKind::Array)
    }
}

/// Flattens a struct into its wire-ordered field list.
///
/// Const attributes met on the way contribute `owner` to their enum.
///
/// # Arguments
/// * `schema` - Schema the struct belongs to
/// * `descriptor` - Struct to flatten
/// * `owner` - Member name contributed by const attributes
/// * `registry` - Enum registry of the current run
///
/// # Returns
/// Stored fields and size sources in wire order.
///
/// # Errors
/// Fails on unknown types, inline cycles, inline attributes referencing
/// non-structs, invalid const attributes and size sources that cannot be
/// resolved to an earlier fixed-width field of the same struct.
pub fn flatten<'a>(
    schema: &'a Schema,
    descriptor: &'a TypeDescriptor,
    owner: &str,
    registry: &mut EnumRegistry,
) -> Result<Vec<FlatField<'a>>, SchemaError> {
    let mut path = vec![descriptor.name.as_str()];
    let mut attributes = Vec::new();
    collect(schema, &descriptor.layout, owner, registry, &mut path, &mut attributes)?;

    let mut fields = Vec::with_capacity(attributes.len());
    for (position, attribute) in attributes.iter().copied().enumerate() {
        let kind = classify(schema, attribute)?;
        if kind == AttributeKind::Array {
            array_element(schema, attribute)?;
        }
        let dependent = attributes
            .iter()
            .copied()
            .find(|other| other.size_field() == Some(attribute.name.as_str()));

        if let Some(source) = attribute.size_field() {
            let resolved = attributes[..position].iter().any(|a| a.name == source);
            if !resolved {
                return Err(SchemaError::UnresolvedSizeSource {
                    type_name: descriptor.name.clone(),
                    field: attribute.name.clone(),
                    source_name: source.to_string(),
                });
            }
        }

        let width = match dependent {
            Some(_) => {
                let width = fixed_width(schema, attribute)?
                    .filter(|w| is_simple_width(*w))
                    .ok_or_else(|| SchemaError::InvalidSizeSource {
                        type_name: descriptor.name.clone(),
                        field: attribute.name.clone(),
                    })?;
                Some(width)
            }
            None => None,
        };

        fields.push(FlatField {
            attribute,
            kind,
            dependent,
            width,
        });
    }

    tracing::trace!(
        type_name = %descriptor.name,
        fields = fields.len(),
        "flattened struct layout"
    );
    Ok(fields)
}

fn collect<'a>(
    schema: &'a Schema,
    layout: &'a [AttributeDescriptor],
    owner: &str,
    registry: &mut EnumRegistry,
    path: &mut Vec<&'a str>,
    out: &mut Vec<&'a AttributeDescriptor>,
) -> Result<(), SchemaError> {
    for attribute in layout {
        if attribute.is_inline() {
            let target = schema
                .get_type(&attribute.type_name)
                .ok_or_else(|| SchemaError::type_not_found(&attribute.type_name, &attribute.name))?;
            if !target.is_struct() {
                return Err(SchemaError::InvalidInline {
                    type_name: path.last().copied().unwrap_or_default().to_string(),
                    target: target.name.clone(),
                });
            }
            if path.contains(&target.name.as_str()) {
                let mut cycle = path.join(" -> ");
                cycle.push_str(" -> ");
                cycle.push_str(&target.name);
                return Err(SchemaError::CircularReference { path: cycle });
            }

            path.push(&target.name);
            collect(schema, &target.layout, owner, registry, path, out)?;
            path.pop();
        } else if attribute.is_const() {
            registry.contribute(schema, attribute, owner)?;
        } else {
            out.push(attribute);
        }
    }
    Ok(())
}
