//! Java enum generation.

use super::helpers::{builtin_type, indent, integer_literal, read_method, reverse, write_method};
use super::method::MethodBuilder;
use crate::error::CodegenError;
use crate::options::GeneratorOptions;
use wirebuild_schema::EnumEntry;

/// Generator for one enum with its accumulated members.
pub struct EnumEmitter<'a> {
    entry: &'a EnumEntry,
    options: &'a GeneratorOptions,
}

impl<'a> EnumEmitter<'a> {
    /// Creates a new enum emitter.
    #[must_use]
    pub fn new(entry: &'a EnumEntry, options: &'a GeneratorOptions) -> Self {
        Self { entry, options }
    }

    /// Generated enum name.
    #[must_use]
    pub fn enum_name(&self) -> &str {
        &self.entry.name
    }

    /// Generates the enum lines.
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if the backing width has no Java
    /// integer type.
    pub fn generate(&self) -> Result<Vec<String>, CodegenError> {
        let name = self.enum_name();
        let width = self.entry.width;
        let java_type = builtin_type(width).ok_or_else(|| {
            CodegenError::generation(format!("enum '{name}' has unsupported width {width}"))
        })?;

        let mut output = vec![format!("public enum {name} {{")];

        let count = self.entry.members.len();
        if count == 0 {
            output.push(indent(";", 1));
        }
        for (i, member) in self.entry.members.iter().enumerate() {
            let terminator = if i + 1 < count { ',' } else { ';' };
            output.push(indent(
                &format!(
                    "{}(({}){}){}",
                    member.name.to_uppercase(),
                    java_type,
                    integer_literal(width, member.value),
                    terminator
                ),
                1,
            ));
        }
        output.push(String::new());

        output.push(indent(&format!("private final {java_type} value;"), 1));
        output.push(String::new());

        let params = vec![format!("{java_type} value")];
        let mut constructor = MethodBuilder::new("private", "", name, &params);
        constructor.push("this.value = value");
        add_method(&mut output, &constructor);

        add_method(&mut output, &self.load_from_binary(java_type));
        add_method(&mut output, &self.serialize());

        output.push("}".to_string());
        Ok(output)
    }

    fn load_from_binary(&self, java_type: &str) -> MethodBuilder {
        let name = self.enum_name();
        let width = self.entry.width;
        let params = vec!["DataInput stream".to_string()];
        let mut method = MethodBuilder::new("public", name, "loadFromBinary", &params)
            .throws("throws Exception")
            .static_();

        method.push(format!("{java_type} val = stream.{}()", read_method(Some(width))));
        if self.options.byte_order.swaps(width as usize) {
            method.push(format!("val = {}", reverse(&self.options.byte_order, width, "val")));
        }
        method.open(format!("for ({name} current : {name}.values())"));
        method.push_raw("if (val == current.value)");
        method.push(indent("return current", 1));
        method.close();
        method.push(format!(
            "throw new RuntimeException(val + \" was not a backing value for {name}.\")"
        ));
        method
    }

    fn serialize(&self) -> MethodBuilder {
        let width = self.entry.width;
        let mut method =
            MethodBuilder::new("public", "byte[]", "serialize", &[]).throws("throws Exception");
        method.push("ByteArrayOutputStream bos = new ByteArrayOutputStream()");
        method.push("DataOutputStream stream = new DataOutputStream(bos)");
        method.push(format!(
            "stream.{}({})",
            write_method(Some(width)),
            reverse(&self.options.byte_order, width, "this.value")
        ));
        method.push("stream.close()");
        method.push("return bos.toByteArray()");
        method
    }
}

fn add_method(output: &mut Vec<String>, method: &MethodBuilder) {
    output.extend(method.lines().iter().map(|line| indent(line, 1)));
    output.push(String::new());
}
