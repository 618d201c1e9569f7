//! Prelude module for convenient imports.
//!
//! ```ignore
//! use wirebuild::prelude::*;
//! ```

// Core types
pub use wirebuild_core::{ByteOrder, ByteOrderPolicy, Record, Value, WireError};

// Schema types
pub use wirebuild_schema::{
    AttributeDescriptor, AttributeKind, EnumTable, Schema, SchemaError, TypeDescriptor, TypeKind,
    from_json_file, from_json_str,
};

// Generation
pub use wirebuild_codegen::{
    CodegenError, GeneratedType, Generator, GeneratorOptions, JavaFile, generate_from_file,
    generate_from_json, generate_to_dir, write_files,
};

// Codec
pub use wirebuild_codec::{Codec, CodecError, Naming};
