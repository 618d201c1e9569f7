//! Java source file framing and output.

use crate::error::CodegenError;
use crate::generator::GeneratedType;
use crate::options::GeneratorOptions;
use std::path::{Path, PathBuf};

const STANDARD_IMPORTS: [&str; 3] = ["java.lang.*", "java.io.*", "java.nio.*"];

/// One generated Java source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaFile {
    /// File name, `<TypeName>.java`.
    pub file_name: String,
    /// File lines.
    pub lines: Vec<String>,
}

impl JavaFile {
    /// Wraps a generated type with the copyright header, package and imports.
    ///
    /// A configured copyright file that does not exist is skipped.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` if the copyright file exists but cannot be
    /// read.
    pub fn frame(
        generated: &GeneratedType,
        options: &GeneratorOptions,
    ) -> Result<Self, CodegenError> {
        let mut lines = copyright_lines(options)?;

        lines.push(format!("package {};", options.package));
        lines.push(String::new());

        lines.extend(STANDARD_IMPORTS.iter().map(|import| format!("import {import};")));
        lines.push(format!("import {}.*;", options.package));
        lines.extend(options.extra_imports.iter().map(|import| format!("import {import};")));
        lines.push(String::new());

        lines.extend(generated.lines.iter().cloned());

        Ok(Self {
            file_name: format!("{}.java", generated.name),
            lines,
        })
    }

    /// File contents, newline terminated.
    #[must_use]
    pub fn contents(&self) -> String {
        let mut contents = self.lines.join("\n");
        contents.push('\n');
        contents
    }

    /// Writes the file into `dir`.
    ///
    /// # Errors
    /// Returns `CodegenError::Io` on write failure.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, CodegenError> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.contents())?;
        tracing::debug!(path = %path.display(), "wrote generated file");
        Ok(path)
    }
}

fn copyright_lines(options: &GeneratorOptions) -> Result<Vec<String>, CodegenError> {
    let Some(path) = &options.copyright else {
        return Ok(Vec::new());
    };
    if !path.is_file() {
        tracing::warn!(path = %path.display(), "copyright file not found, skipping header");
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path)?;
    let mut lines: Vec<String> = text.lines().map(|line| line.trim().to_string()).collect();
    lines.push(String::new());
    Ok(lines)
}

/// Writes every file into `dir`, creating it if needed.
///
/// # Errors
/// Returns `CodegenError::Io` if the directory or a file cannot be written.
pub fn write_files(
    dir: impl AsRef<Path>,
    files: &[JavaFile],
) -> Result<Vec<PathBuf>, CodegenError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let paths = files
        .iter()
        .map(|file| file.write_to(dir))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(dir = %dir.display(), files = paths.len(), "wrote generated sources");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated() -> GeneratedType {
        GeneratedType {
            name: "Kind".to_string(),
            lines: vec!["public enum Kind {".to_string(), "}".to_string()],
        }
    }

    #[test]
    fn test_frame_without_copyright() {
        let file = JavaFile::frame(&generated(), &GeneratorOptions::default()).expect("frame");
        assert_eq!(file.file_name, "Kind.java");
        assert_eq!(
            file.lines,
            vec![
                "package catapult.builders;",
                "",
                "import java.lang.*;",
                "import java.io.*;",
                "import java.nio.*;",
                "import catapult.builders.*;",
                "",
                "public enum Kind {",
                "}",
            ]
        );
    }

    #[test]
    fn test_frame_with_copyright_and_extra_imports() {
        let dir = tempfile::tempdir().expect("temp dir");
        let header = dir.path().join("HEADER");
        let text = "  // Copyright (c) 2026  \n// All rights reserved.\n";
        std::fs::write(&header, text).expect("write");

        let mut options = GeneratorOptions::default().with_copyright(&header);
        options.extra_imports.push("java.util.ArrayList".to_string());

        let file = JavaFile::frame(&generated(), &options).expect("frame");
        assert_eq!(file.lines[0], "// Copyright (c) 2026");
        assert_eq!(file.lines[1], "// All rights reserved.");
        assert_eq!(file.lines[2], "");
        assert_eq!(file.lines[3], "package catapult.builders;");
        assert!(file.lines.contains(&"import java.util.ArrayList;".to_string()));
    }

    #[test]
    fn test_missing_copyright_is_skipped() {
        let options = GeneratorOptions::default().with_copyright("/nonexistent/HEADER");
        let file = JavaFile::frame(&generated(), &options).expect("frame");
        assert_eq!(file.lines[0], "package catapult.builders;");
    }

    #[test]
    fn test_write_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let out = dir.path().join("out");
        let file = JavaFile::frame(&generated(), &GeneratorOptions::default()).expect("frame");

        let paths = write_files(&out, &[file]).expect("write");
        assert_eq!(paths, vec![out.join("Kind.java")]);
        let written = std::fs::read_to_string(&paths[0]).expect("read");
        assert!(written.starts_with("package catapult.builders;\n"));
        assert!(written.ends_with("}\n"));
    }
}
