//! Error types for the reference codec.

use thiserror::Error;

/// Error type for codec construction and use.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The schema could not be resolved.
    #[error("schema error: {0}")]
    Schema(#[from] wirebuild_schema::SchemaError),

    /// Reading, writing or accessing a value failed.
    #[error("wire error: {0}")]
    Wire(#[from] wirebuild_core::WireError),
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
