//! Conditional field resolution.
//!
//! A conditional attribute names a guard field and the value the guard must
//! hold for the attribute to be present. The guard may live in the same
//! layout or in any struct spliced in by an inline attribute.

use crate::types::{AttributeDescriptor, Schema, TypeKind};

/// Inline nesting is bounded even for schemas that were never flattened.
const MAX_INLINE_DEPTH: usize = 64;

/// Finds the attribute named `name` in `layout`: direct siblings first, then
/// recursively inside inline siblings. First match wins.
#[must_use]
pub fn find_guard<'a>(
    schema: &'a Schema,
    layout: &'a [AttributeDescriptor],
    name: &str,
) -> Option<&'a AttributeDescriptor> {
    find_at_depth(schema, layout, name, 0)
}

fn find_at_depth<'a>(
    schema: &'a Schema,
    layout: &'a [AttributeDescriptor],
    name: &str,
    depth: usize,
) -> Option<&'a AttributeDescriptor> {
    if let Some(found) = layout.iter().find(|a| !a.is_inline() && a.name == name) {
        return Some(found);
    }
    if depth >= MAX_INLINE_DEPTH {
        return None;
    }
    layout
        .iter()
        .filter(|a| a.is_inline())
        .filter_map(|a| schema.get_type(&a.type_name))
        .find_map(|target| find_at_depth(schema, &target.layout, name, depth + 1))
}

/// Value a guard field is compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardValue {
    /// Member of the guard's enum type, upper-cased.
    Member {
        /// Enum type name.
        enum_name: String,
        /// Member name.
        member: String,
    },
    /// Integer literal, written as given in the schema.
    Literal(String),
}

impl GuardValue {
    /// Parses an integer literal: decimal or `0x`-prefixed hexadecimal.
    #[must_use]
    pub fn literal_value(&self) -> Option<u64> {
        match self {
            Self::Literal(text) => {
                let text = text.trim();
                match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
                    Some(hex) => u64::from_str_radix(hex, 16).ok(),
                    None => text.parse().ok(),
                }
            }
            Self::Member { .. } => None,
        }
    }
}

/// Resolved presence condition of one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard<'a> {
    /// Name of the guard field.
    pub field: &'a str,
    /// Guard attribute, when it resolves.
    pub attribute: Option<&'a AttributeDescriptor>,
    /// Expected guard value.
    pub expected: GuardValue,
}

/// Resolves the condition of `attribute` against the struct layout it is
/// flattened from. Returns `None` for unconditional attributes.
///
/// An enum-typed guard compares against the upper-cased member of that
/// enum; any other guard (including one that does not resolve) compares
/// against the literal.
#[must_use]
pub fn resolve_guard<'a>(
    schema: &'a Schema,
    layout: &'a [AttributeDescriptor],
    attribute: &'a AttributeDescriptor,
) -> Option<Guard<'a>> {
    let field = attribute.condition.as_deref()?;
    let value = attribute.condition_value.as_deref().unwrap_or_default();
    let guard = find_guard(schema, layout, field);

    let enum_name = guard
        .and_then(|g| schema.get_type(&g.type_name))
        .filter(|d| d.kind == TypeKind::Enum)
        .map(|d| d.name.clone());

    let expected = match enum_name {
        Some(enum_name) => GuardValue::Member {
            enum_name,
            member: value.to_uppercase(),
        },
        None => GuardValue::Literal(value.to_string()),
    };

    Some(Guard {
        field,
        attribute: guard,
        expected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BYTE_TYPE, EnumValue, TypeDescriptor};

    fn schema() -> Schema {
        vec![
            TypeDescriptor::enumeration("LinkAction", 1, vec![EnumValue::new("link", 1)]),
            TypeDescriptor::structure(
                "HeaderBody",
                vec![AttributeDescriptor::new("action", "LinkAction")],
            ),
            TypeDescriptor::structure(
                "MiddleBody",
                vec![AttributeDescriptor::inline("HeaderBody")],
            ),
            TypeDescriptor::structure(
                "Msg",
                vec![
                    AttributeDescriptor::new("version", BYTE_TYPE),
                    AttributeDescriptor::inline("MiddleBody"),
                    AttributeDescriptor::new("target", BYTE_TYPE)
                        .with_size(8u64)
                        .with_condition("action", "link"),
                    AttributeDescriptor::new("extra", BYTE_TYPE)
                        .with_size(2u64)
                        .with_condition("version", "0x02"),
                ],
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_direct_sibling() {
        let schema = schema();
        let msg = schema.get_type("Msg").expect("Msg");
        let guard = find_guard(&schema, &msg.layout, "version").expect("guard");
        assert_eq!(guard.type_name, BYTE_TYPE);
    }

    #[test]
    fn test_guard_in_inline_ancestor() {
        let schema = schema();
        let msg = schema.get_type("Msg").expect("Msg");
        let guard = find_guard(&schema, &msg.layout, "action").expect("guard");
        assert_eq!(guard.type_name, "LinkAction");
        assert!(find_guard(&schema, &msg.layout, "missing").is_none());
    }

    #[test]
    fn test_enum_guard_resolves_to_member() {
        let schema = schema();
        let msg = schema.get_type("Msg").expect("Msg");
        let guard = resolve_guard(&schema, &msg.layout, &msg.layout[2]).expect("guard");
        assert_eq!(guard.field, "action");
        assert_eq!(
            guard.expected,
            GuardValue::Member {
                enum_name: "LinkAction".to_string(),
                member: "LINK".to_string(),
            }
        );
    }

    #[test]
    fn test_integer_guard_resolves_to_literal() {
        let schema = schema();
        let msg = schema.get_type("Msg").expect("Msg");
        let guard = resolve_guard(&schema, &msg.layout, &msg.layout[3]).expect("guard");
        assert_eq!(guard.expected, GuardValue::Literal("0x02".to_string()));
        assert_eq!(guard.expected.literal_value(), Some(2));
        assert!(resolve_guard(&schema, &msg.layout, &msg.layout[0]).is_none());
    }
}
