//! Java method assembly.

use super::helpers::indent;

/// Builds one Java method: a signature line, an indented body and the
/// closing brace.
///
/// Statements pushed with [`push`](Self::push) get a trailing semicolon;
/// [`push_raw`](Self::push_raw) lines are emitted as given. Blocks opened
/// with [`open`](Self::open) indent every line pushed until the matching
/// [`close`](Self::close).
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    scope: String,
    is_static: bool,
    return_type: String,
    name: String,
    params: Vec<String>,
    throws: Option<String>,
    body: Vec<String>,
    depth: usize,
}

impl MethodBuilder {
    /// Creates a method. An empty return type produces a constructor.
    #[must_use]
    pub fn new(scope: &str, return_type: &str, name: &str, params: &[String]) -> Self {
        Self {
            scope: scope.to_string(),
            is_static: false,
            return_type: return_type.to_string(),
            name: name.to_string(),
            params: params.to_vec(),
            throws: None,
            body: Vec::new(),
            depth: 0,
        }
    }

    /// Declares checked exceptions.
    #[must_use]
    pub fn throws(mut self, exceptions: &str) -> Self {
        self.throws = Some(exceptions.to_string());
        self
    }

    /// Makes the method static.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Appends a statement.
    pub fn push(&mut self, statement: impl AsRef<str>) {
        let line = format!("{};", statement.as_ref());
        self.push_raw(line);
    }

    /// Appends a line without a semicolon. Empty lines stay empty.
    pub fn push_raw(&mut self, line: impl AsRef<str>) {
        let line = line.as_ref();
        if line.is_empty() {
            self.body.push(String::new());
        } else {
            self.body.push(indent(line, self.depth + 1));
        }
    }

    /// Appends `header {` and indents what follows.
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.push_raw(format!("{} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Closes the innermost block and opens a continuation such as
    /// `} else {`.
    pub fn reopen(&mut self, header: impl AsRef<str>) {
        self.depth = self.depth.saturating_sub(1);
        self.push_raw(format!("}} {} {{", header.as_ref()));
        self.depth += 1;
    }

    /// Closes the innermost block.
    pub fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.push_raw("}");
    }

    /// Signature line.
    #[must_use]
    pub fn signature(&self) -> String {
        let mut parts = vec![self.scope.as_str()];
        if self.is_static {
            parts.push("static");
        }
        if !self.return_type.is_empty() {
            parts.push(self.return_type.as_str());
        }
        let mut line = format!("{} {}({})", parts.join(" "), self.name, self.params.join(", "));
        if let Some(throws) = &self.throws {
            line.push(' ');
            line.push_str(throws);
        }
        line.push_str(" {");
        line
    }

    /// Complete method lines, unindented at the outer level.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.body.len() + 2);
        lines.push(self.signature());
        lines.extend(self.body.iter().cloned());
        lines.push("}".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_method() {
        let mut method = MethodBuilder::new("public", "int", "getSize", &[]);
        method.push("return this.size");
        assert_eq!(
            method.lines(),
            vec!["public int getSize() {", "    return this.size;", "}"]
        );
    }

    #[test]
    fn test_static_with_throws() {
        let params = vec!["DataInput stream".to_string()];
        let method = MethodBuilder::new("public", "Kind", "loadFromBinary", &params)
            .throws("throws Exception")
            .static_();
        assert_eq!(
            method.signature(),
            "public static Kind loadFromBinary(DataInput stream) throws Exception {"
        );
    }

    #[test]
    fn test_constructor_signature() {
        let params = vec!["byte value".to_string()];
        let method = MethodBuilder::new("private", "", "Kind", &params);
        assert_eq!(method.signature(), "private Kind(byte value) {");
    }

    #[test]
    fn test_nested_blocks() {
        let mut method = MethodBuilder::new("public", "void", "run", &[]);
        method.open("if (a)");
        method.push("x()");
        method.reopen("else");
        method.push("y()");
        method.close();
        method.push_raw("");
        assert_eq!(
            method.lines(),
            vec![
                "public void run() {",
                "    if (a) {",
                "        x();",
                "    } else {",
                "        y();",
                "    }",
                "",
                "}",
            ]
        );
    }
}
