//! Java naming, type mapping and stream method helpers.

use crate::error::CodegenError;
use crate::options::GeneratorOptions;
use wirebuild_core::ByteOrderPolicy;
use wirebuild_schema::{
    AttributeDescriptor, AttributeKind, ElementKind, Guard, GuardValue, Schema, array_element,
    fixed_width,
};

const INDENT: &str = "    ";

/// Indents `code` by `levels` levels of four spaces.
#[must_use]
pub fn indent(code: &str, levels: usize) -> String {
    format!("{}{}", INDENT.repeat(levels), code)
}

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Getter name of a field.
#[must_use]
pub fn getter_name(field: &str) -> String {
    format!("get{}", capitalize(field))
}

/// Setter name of a field.
#[must_use]
pub fn setter_name(field: &str) -> String {
    format!("set{}", capitalize(field))
}

/// Java primitive of an integer width.
#[must_use]
pub fn builtin_type(width: u64) -> Option<&'static str> {
    match width {
        1 => Some("byte"),
        2 => Some("short"),
        4 => Some("int"),
        8 => Some("long"),
        _ => None,
    }
}

/// Java integer literal of a backing value. Values beyond the `int` range
/// are written in hex so that they stay valid literals once cast.
#[must_use]
pub fn integer_literal(width: u64, value: u64) -> String {
    if value <= i32::MAX as u64 {
        value.to_string()
    } else if width >= 8 {
        format!("0x{value:X}L")
    } else {
        format!("0x{:X}", value & 0xFFFF_FFFF)
    }
}

/// Boxed Java type of an integer width.
fn boxed_type(width: u64) -> Option<&'static str> {
    match width {
        1 => Some("Byte"),
        2 => Some("Short"),
        4 => Some("Integer"),
        8 => Some("Long"),
        _ => None,
    }
}

/// `DataInput` method reading `width` bytes. Anything that is not an
/// integer width is read with `readFully`.
#[must_use]
pub fn read_method(width: Option<u64>) -> &'static str {
    match width {
        Some(1) => "readByte",
        Some(2) => "readShort",
        Some(4) => "readInt",
        Some(8) => "readLong",
        _ => "readFully",
    }
}

/// `DataOutputStream` method writing `width` bytes.
#[must_use]
pub fn write_method(width: Option<u64>) -> &'static str {
    match width {
        Some(1) => "writeByte",
        Some(2) => "writeShort",
        Some(4) => "writeInt",
        Some(8) => "writeLong",
        _ => "write",
    }
}

/// Wraps `expr` in the byte reversal of its width when the policy requires
/// one; single bytes and matching orders are returned unchanged.
#[must_use]
pub fn reverse(policy: &ByteOrderPolicy, width: u64, expr: &str) -> String {
    let wrapper = match width {
        2 => "Short.reverseBytes",
        4 => "Integer.reverseBytes",
        8 => "Long.reverseBytes",
        _ => return expr.to_string(),
    };
    if policy.swaps(width as usize) {
        format!("{wrapper}({expr})")
    } else {
        expr.to_string()
    }
}

/// Width of an integer-typed field.
///
/// # Errors
/// Returns `CodegenError::Generation` if the field has no integer width.
pub fn integer_width(
    schema: &Schema,
    attribute: &AttributeDescriptor,
) -> Result<u64, CodegenError> {
    fixed_width(schema, attribute)?.ok_or_else(|| {
        CodegenError::generation(format!("field '{}' has no fixed width", attribute.name))
    })
}

/// Java type of an array element.
///
/// # Errors
/// Propagates element resolution failures.
pub fn element_type(
    schema: &Schema,
    options: &GeneratorOptions,
    attribute: &AttributeDescriptor,
) -> Result<String, CodegenError> {
    match array_element(schema, attribute)? {
        ElementKind::Integer(width) => boxed_type(width)
            .map(str::to_string)
            .ok_or_else(|| CodegenError::generation(format!("unsupported element width {width}"))),
        ElementKind::Composite(descriptor) => Ok(options.class_name(schema, &descriptor.name)),
    }
}

/// Java type of a stored field.
///
/// # Errors
/// Fails if a Simple field has no integer width or an array element cannot
/// be resolved.
pub fn field_type(
    schema: &Schema,
    options: &GeneratorOptions,
    attribute: &AttributeDescriptor,
    kind: AttributeKind,
) -> Result<String, CodegenError> {
    match kind {
        AttributeKind::Simple => {
            let width = integer_width(schema, attribute)?;
            builtin_type(width).map(str::to_string).ok_or_else(|| {
                let name = &attribute.name;
                CodegenError::generation(format!("unsupported width {width} for '{name}'"))
            })
        }
        AttributeKind::Buffer => Ok("ByteBuffer".to_string()),
        AttributeKind::Array => Ok(format!(
            "java.util.ArrayList<{}>",
            element_type(schema, options, attribute)?
        )),
        AttributeKind::Custom => Ok(options.class_name(schema, &attribute.type_name)),
    }
}

/// Right-hand side of a guard comparison: `Enum.MEMBER`, or the literal cast
/// to the guard's width so that unsigned values compare equal to the signed
/// Java field.
#[must_use]
pub fn guard_literal(schema: &Schema, options: &GeneratorOptions, guard: &Guard<'_>) -> String {
    match &guard.expected {
        GuardValue::Member { enum_name, member } => {
            format!("{}.{}", options.class_name(schema, enum_name), member)
        }
        GuardValue::Literal(text) => {
            let width = guard
                .attribute
                .and_then(|attribute| fixed_width(schema, attribute).ok().flatten());
            match (width, guard.expected.literal_value()) {
                (Some(width), Some(value)) => match builtin_type(width) {
                    Some(java_type) => format!("({java_type}){}", integer_literal(width, value)),
                    None => text.clone(),
                },
                _ => text.clone(),
            }
        }
    }
}

/// Widens a size-source read to a non-negative `int`.
#[must_use]
pub fn unsigned_size(width: u64, expr: &str) -> String {
    match width {
        1 => format!("Byte.toUnsignedInt({expr})"),
        2 => format!("Short.toUnsignedInt({expr})"),
        4 => format!("Math.toIntExact(Integer.toUnsignedLong({expr}))"),
        _ => format!("Math.toIntExact({expr})"),
    }
}
