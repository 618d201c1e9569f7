//! Generator configuration.

use crate::error::CodegenError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use wirebuild_core::ByteOrderPolicy;
use wirebuild_schema::{Schema, TypeKind};

/// Default Java package of generated files.
pub const DEFAULT_PACKAGE: &str = "catapult.builders";

/// Default suffix appended to generated struct class names.
pub const DEFAULT_TYPE_SUFFIX: &str = "Builder";

/// Default suffix marking inline-only helper structs.
pub const DEFAULT_HELPER_SUFFIX: &str = "Body";

/// Options of one generation run. Every field has a default, so an empty
/// JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Package declared by every generated file.
    pub package: String,
    /// Imports emitted after the standard ones.
    pub extra_imports: Vec<String>,
    /// File whose lines are prepended to every generated file.
    pub copyright: Option<PathBuf>,
    /// Suffix of generated struct class names.
    pub type_suffix: String,
    /// Structs whose name ends with this suffix are only inlined, never emitted.
    pub helper_suffix: String,
    /// Schema byte order versus stream byte order.
    pub byte_order: ByteOrderPolicy,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package: DEFAULT_PACKAGE.to_string(),
            extra_imports: Vec::new(),
            copyright: None,
            type_suffix: DEFAULT_TYPE_SUFFIX.to_string(),
            helper_suffix: DEFAULT_HELPER_SUFFIX.to_string(),
            byte_order: ByteOrderPolicy::default(),
        }
    }
}

impl GeneratorOptions {
    /// Parses options from JSON.
    ///
    /// # Errors
    /// Returns `CodegenError::Options` if the JSON does not describe options.
    pub fn from_json_str(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` or `CodegenError::Options`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Sets the package.
    #[must_use]
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Sets the copyright header file.
    #[must_use]
    pub fn with_copyright(mut self, path: impl Into<PathBuf>) -> Self {
        self.copyright = Some(path.into());
        self
    }

    /// Sets the byte order policy.
    #[must_use]
    pub fn with_byte_order(mut self, policy: ByteOrderPolicy) -> Self {
        self.byte_order = policy;
        self
    }

    /// Returns true if the struct is an inline-only helper.
    #[must_use]
    pub fn is_helper(&self, struct_name: &str) -> bool {
        !self.helper_suffix.is_empty() && struct_name.ends_with(&self.helper_suffix)
    }

    /// Generated name of a schema type. Structs carry the type suffix, enums
    /// keep their schema name.
    #[must_use]
    pub fn class_name(&self, schema: &Schema, type_name: &str) -> String {
        match schema.get_type(type_name).map(|d| d.kind) {
            Some(TypeKind::Struct) => format!("{}{}", type_name, self.type_suffix),
            _ => type_name.to_string(),
        }
    }
}
