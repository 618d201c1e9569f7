//! Error types for wire-level operations.
//!
//! These are the failures generated code surfaces to its caller. None of
//! them is retried.

use thiserror::Error;

/// Error type for reading, writing and accessing wire types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A conditional field was accessed or serialized while its guard did not
    /// hold the expected discriminant.
    #[error("invalid state: field '{field}' requires '{condition}' == {expected}")]
    InvalidState {
        /// Conditional field name.
        field: String,
        /// Guard field name.
        condition: String,
        /// Expected guard value.
        expected: String,
    },

    /// A buffer assignment was null or had the wrong length.
    #[error("invalid argument: {field}: {message}")]
    InvalidArgument {
        /// Field name.
        field: String,
        /// Error message.
        message: String,
    },

    /// An enum backing value matched none of the enum's members.
    #[error("{value} was not a backing value for {enum_name}")]
    Decode {
        /// Enum type name.
        enum_name: String,
        /// Backing value read from the wire.
        value: u64,
    },

    /// The input ended before the type was fully read.
    #[error("unexpected end of input: required {required} bytes, available {available} bytes")]
    UnexpectedEof {
        /// Bytes needed by the current read.
        required: usize,
        /// Bytes left in the input.
        available: usize,
    },

    /// A stored field needed for serialization was never set.
    #[error("missing field '{field}' in '{type_name}'")]
    MissingField {
        /// Owning type name.
        type_name: String,
        /// Field name.
        field: String,
    },

    /// A value did not have the shape its field requires.
    #[error("type mismatch for '{field}': expected {expected}")]
    TypeMismatch {
        /// Field or type name.
        field: String,
        /// Expected value shape.
        expected: String,
    },

    /// The requested type does not exist or cannot be encoded on its own.
    #[error("unknown wire type '{name}'")]
    UnknownType {
        /// Type name.
        name: String,
    },
}

impl WireError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected: expected.into(),
        }
    }
}

/// Result type alias for wire operations.
pub type Result<T> = std::result::Result<T, WireError>;
