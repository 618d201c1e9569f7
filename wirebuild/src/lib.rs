//! # wirebuild
//!
//! Compiles binary layout schemas into Java classes that read and write
//! the described wire format.
//!
//! A schema is a JSON object mapping type names to primitive, struct or
//! enum descriptors. Struct fields are classified into four encoding
//! strategies (simple integers, byte buffers, repeated collections and
//! nested types), inline helper structs are flattened into their parents,
//! and enum members are collected from declarations and from `const`
//! attributes of every struct.
//!
//! ## Quick Start
//!
//! ```ignore
//! use wirebuild::prelude::*;
//!
//! let files = generate_from_json(schema_json, &GeneratorOptions::default())?;
//! write_files(Path::new("out"), &files)?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Byte order policy, wire errors, dynamic values
//! - [`schema`] - Schema model, loading and resolution
//! - [`codegen`] - Java generation and file output
//! - [`codec`] - Reference codec running the same layouts against bytes

pub mod prelude;

/// Byte order policy, wire errors and dynamic values.
pub mod core {
    pub use wirebuild_core::*;
}

/// Schema model, loading and resolution.
pub mod schema {
    pub use wirebuild_schema::*;
}

/// Java code generation.
pub mod codegen {
    pub use wirebuild_codegen::*;
}

/// Reference codec.
pub mod codec {
    pub use wirebuild_codec::*;
}

// Re-export commonly used items at the crate root
pub use wirebuild_codec::Codec;
pub use wirebuild_codegen::{
    CodegenError, GeneratorOptions, JavaFile, generate_from_file, generate_from_json,
    generate_to_dir, write_files,
};
pub use wirebuild_core::{ByteOrder, ByteOrderPolicy, Record, Value, WireError};
pub use wirebuild_schema::{Schema, SchemaError, from_json_file, from_json_str};
