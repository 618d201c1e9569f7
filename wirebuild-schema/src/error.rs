//! Error types for schema loading and resolution.

use thiserror::Error;

/// Error type for schema loading.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for schema resolution. Every variant aborts a generation run.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Loading error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Type not found.
    #[error("type '{name}' not found (referenced by field '{field}')")]
    TypeNotFound {
        /// Type name.
        name: String,
        /// Referencing field.
        field: String,
    },

    /// Enum backing width is not a supported integer width.
    #[error("enum '{enum_name}' has unsupported backing size {size}")]
    UnsupportedEnumWidth {
        /// Enum name.
        enum_name: String,
        /// Declared size.
        size: u64,
    },

    /// A string size does not name any field of the struct.
    #[error("size source '{source_name}' of field '{field}' in '{type_name}' not found")]
    UnresolvedSizeSource {
        /// Owning struct name.
        type_name: String,
        /// Dependent field name.
        field: String,
        /// Missing size-source name.
        source_name: String,
    },

    /// A size source is not a fixed-width integer field.
    #[error("size source '{field}' in '{type_name}' must be a 1, 2, 4 or 8 byte integer")]
    InvalidSizeSource {
        /// Owning struct name.
        type_name: String,
        /// Size-source field name.
        field: String,
    },

    /// Array element type cannot be streamed element by element.
    #[error("array field '{field}' has unsupported element type '{type_name}'")]
    UnsupportedElement {
        /// Array field name.
        field: String,
        /// Element type name.
        type_name: String,
    },

    /// Two contributions to one enum share a member name.
    #[error("duplicate member '{member}' in enum '{enum_name}'")]
    DuplicateEnumMember {
        /// Enum name.
        enum_name: String,
        /// Member name (upper-cased).
        member: String,
    },

    /// Circular inline reference.
    #[error("circular inline reference detected: {path}")]
    CircularReference {
        /// Path of the circular reference.
        path: String,
    },

    /// An inline attribute references something other than a struct.
    #[error("inline attribute in '{type_name}' references non-struct type '{target}'")]
    InvalidInline {
        /// Owning struct name.
        type_name: String,
        /// Referenced type name.
        target: String,
    },

    /// A const attribute is missing the information needed to contribute.
    #[error("const attribute '{field}' is invalid: {message}")]
    InvalidConst {
        /// Attribute name.
        field: String,
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a type not found error.
    pub fn type_not_found(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::TypeNotFound {
            name: name.into(),
            field: field.into(),
        }
    }
}
