//! # wirebuild schema
//!
//! Binary layout schema model and resolution engine.
//!
//! This crate provides:
//! - Type descriptors for primitives, structs and enums
//! - JSON schema loading in document order
//! - Attribute classification into encoding strategies
//! - Inline flattening and conditional field resolution
//! - The enum registry fed by const attributes

pub mod classify;
pub mod condition;
pub mod error;
pub mod inline;
pub mod load;
pub mod registry;
pub mod types;

pub use classify::{
    AttributeKind, ElementKind, array_element, attribute_size, classify, fixed_width,
};
pub use condition::{Guard, GuardValue, find_guard, resolve_guard};
pub use error::{ParseError, SchemaError};
pub use inline::{FlatField, flatten};
pub use load::{from_json_file, from_json_str};
pub use registry::{EnumEntry, EnumRegistry, EnumTable};
pub use types::{
    AttributeDescriptor, BYTE_TYPE, Disposition, EnumValue, Schema, SizeSpec, TypeDescriptor,
    TypeKind,
};
