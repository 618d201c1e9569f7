//! # wirebuild codegen
//!
//! Java source generation from binary layout schemas.
//!
//! This crate provides:
//! - Struct classes with accessors, `loadFromBinary` and `serialize`
//! - Enums whose members include values contributed by const attributes
//! - File framing (copyright, package, imports) and output
//! - Generator options loadable from JSON

pub mod error;
pub mod generator;
pub mod java;
pub mod options;

pub use error::CodegenError;
pub use generator::{GeneratedType, Generator};
pub use java::{JavaFile, write_files};
pub use options::GeneratorOptions;

use std::path::{Path, PathBuf};

/// Generates framed Java files from a JSON schema string.
///
/// # Arguments
/// * `json` - Schema catalog as a JSON object of `name -> descriptor`
/// * `options` - Package, suffixes, imports and byte order
///
/// # Returns
/// One file per generated type: structs in schema order, then enums.
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_json(
    json: &str,
    options: &GeneratorOptions,
) -> Result<Vec<JavaFile>, CodegenError> {
    let schema = wirebuild_schema::from_json_str(json)?;
    let generated = Generator::new(&schema, options).generate()?;
    generated
        .iter()
        .map(|generated| JavaFile::frame(generated, options))
        .collect()
}

/// Generates framed Java files from a JSON schema file.
///
/// # Arguments
/// * `path` - Path to the JSON schema file
/// * `options` - Generator options
///
/// # Returns
/// The framed files, not yet written.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &Path,
    options: &GeneratorOptions,
) -> Result<Vec<JavaFile>, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_from_json(&json, options)
}

/// Generates Java files from a schema file and writes them into `out_dir`.
///
/// # Arguments
/// * `schema_path` - Path to the JSON schema file
/// * `out_dir` - Output directory, created if missing
/// * `options` - Generator options
///
/// # Returns
/// Paths of the written files.
///
/// # Errors
/// Returns `CodegenError` if any step fails; nothing is written when
/// generation fails.
pub fn generate_to_dir(
    schema_path: &Path,
    out_dir: &Path,
    options: &GeneratorOptions,
) -> Result<Vec<PathBuf>, CodegenError> {
    tracing::info!(schema = %schema_path.display(), out = %out_dir.display(), "generating");
    let files = generate_from_file(schema_path, options)?;
    write_files(out_dir, &files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIND_MSG: &str = r#"{
        "Kind": {"type": "enum", "size": 1, "values": [{"name": "a", "value": 1}]},
        "Msg": {"type": "struct", "layout": [
            {"name": "kind", "type": "Kind"},
            {"name": "len", "type": "byte", "size": 4},
            {"name": "payload", "type": "byte", "size": "len"}
        ]}
    }"#;

    #[test]
    fn test_generate_from_json() {
        let files = generate_from_json(KIND_MSG, &GeneratorOptions::default()).expect("generate");
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, vec!["MsgBuilder.java", "Kind.java"]);
        assert!(files[0].lines.contains(&"public class MsgBuilder {".to_string()));
    }

    #[test]
    fn test_generate_to_dir() {
        let dir = tempfile::tempdir().expect("temp dir");
        let schema_path = dir.path().join("schema.json");
        std::fs::write(&schema_path, KIND_MSG).expect("write");

        let out = dir.path().join("java");
        let paths =
            generate_to_dir(&schema_path, &out, &GeneratorOptions::default()).expect("generate");
        assert_eq!(paths.len(), 2);
        assert!(out.join("Kind.java").is_file());
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let err = generate_from_json("{", &GeneratorOptions::default()).expect_err("should fail");
        assert!(matches!(err, CodegenError::Parse(_)));
    }
}
