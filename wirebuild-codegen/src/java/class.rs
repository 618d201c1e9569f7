//! Java class generation for struct types.

use super::helpers::{
    builtin_type, element_type, field_type, getter_name, guard_literal, indent, integer_width,
    read_method, reverse, setter_name, unsigned_size, write_method,
};
use super::method::MethodBuilder;
use crate::error::CodegenError;
use crate::options::GeneratorOptions;
use wirebuild_schema::{
    AttributeKind, ElementKind, EnumRegistry, FlatField, Guard, Schema, SizeSpec, TypeDescriptor,
    array_element, attribute_size, flatten, resolve_guard,
};

const ILLEGAL_STATE: &str = "throw new java.lang.IllegalStateException()";

/// Generator for one struct class.
///
/// The struct is flattened once on construction; accessors, `loadFromBinary`
/// and `serialize` all walk that same field list.
pub struct StructEmitter<'a> {
    schema: &'a Schema,
    options: &'a GeneratorOptions,
    descriptor: &'a TypeDescriptor,
    class_name: String,
    fields: Vec<FlatField<'a>>,
}

impl<'a> StructEmitter<'a> {
    /// Creates the emitter, flattening the struct and recording its const
    /// contributions in `registry`.
    ///
    /// # Errors
    /// Propagates schema resolution failures.
    pub fn new(
        schema: &'a Schema,
        options: &'a GeneratorOptions,
        descriptor: &'a TypeDescriptor,
        registry: &mut EnumRegistry,
    ) -> Result<Self, CodegenError> {
        let class_name = options.class_name(schema, &descriptor.name);
        let fields = flatten(schema, descriptor, &class_name, registry)?;
        Ok(Self {
            schema,
            options,
            descriptor,
            class_name,
            fields,
        })
    }

    /// Generated class name.
    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Generates the class lines.
    ///
    /// # Errors
    /// Returns `CodegenError` if a field cannot be mapped to a Java type.
    pub fn generate(&self) -> Result<Vec<String>, CodegenError> {
        let mut output = vec![format!("public class {} {{", self.class_name)];
        let mut declarations = Vec::new();

        for field in self.fields.iter().filter(|f| !f.is_size_source()) {
            let java_type = field_type(self.schema, self.options, field.attribute, field.kind)?;
            add_method(&mut output, &self.getter(field, &java_type));
            add_method(&mut output, &self.setter(field, &java_type)?);
            declarations.push(format!("private {} {};", java_type, field.name()));
        }

        add_method(&mut output, &self.load_from_binary()?);
        add_method(&mut output, &self.serialize()?);

        output.extend(declarations.iter().map(|line| indent(line, 1)));
        output.push(String::new());
        output.push("}".to_string());
        Ok(output)
    }

    fn guard(&self, field: &FlatField<'a>) -> Option<Guard<'a>> {
        resolve_guard(self.schema, &self.descriptor.layout, field.attribute)
    }

    fn guard_check(&self, method: &mut MethodBuilder, field: &FlatField<'a>) {
        if let Some(guard) = self.guard(field) {
            let expected = guard_literal(self.schema, self.options, &guard);
            method.push_raw(format!("if (this.{} != {})", guard.field, expected));
            method.push(indent(ILLEGAL_STATE, 1));
            method.push_raw("");
        }
    }

    fn getter(&self, field: &FlatField<'a>, java_type: &str) -> MethodBuilder {
        let mut getter = MethodBuilder::new("public", java_type, &getter_name(field.name()), &[]);
        self.guard_check(&mut getter, field);
        getter.push(format!("return this.{}", field.name()));
        getter
    }

    fn setter(
        &self,
        field: &FlatField<'a>,
        java_type: &str,
    ) -> Result<MethodBuilder, CodegenError> {
        let name = field.name();
        let params = vec![format!("{java_type} {name}")];
        let mut setter = MethodBuilder::new("public", "void", &setter_name(name), &params);
        self.guard_check(&mut setter, field);

        if field.kind == AttributeKind::Buffer {
            setter.push_raw(format!("if ({name} == null)"));
            setter.push(indent(&format!("throw new NullPointerException(\"{name}\")"), 1));
            setter.push_raw("");
            if let SizeSpec::Fixed(size) = attribute_size(self.schema, field.attribute)? {
                setter.push_raw(format!("if ({name}.array().length != {size})"));
                let message = format!("{name} should be {size} bytes");
                setter.push(indent(
                    &format!("throw new IllegalArgumentException(\"{message}\")"),
                    1,
                ));
                setter.push_raw("");
            }
        }

        setter.push(format!("this.{name} = {name}"));
        Ok(setter)
    }

    fn load_from_binary(&self) -> Result<MethodBuilder, CodegenError> {
        let params = vec!["DataInput stream".to_string()];
        let mut method = MethodBuilder::new("public", &self.class_name, "loadFromBinary", &params)
            .throws("throws Exception")
            .static_();
        method.push(format!("{0} obj = new {0}()", self.class_name));

        for field in &self.fields {
            if field.is_size_source() {
                self.load_size_source(&mut method, field)?;
                continue;
            }

            let guard = self.guard(field);
            if let Some(guard) = &guard {
                let expected = guard_literal(self.schema, self.options, &guard);
                method.open(format!("if (obj.{}() == {})", getter_name(guard.field), expected));
            }
            match field.kind {
                AttributeKind::Simple => self.load_simple(&mut method, field)?,
                AttributeKind::Buffer => self.load_buffer(&mut method, field)?,
                AttributeKind::Array => self.load_array(&mut method, field)?,
                AttributeKind::Custom => self.load_custom(&mut method, field),
            }
            if guard.is_some() {
                method.close();
            }
        }

        method.push("return obj");
        Ok(method)
    }

    fn load_size_source(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let width = field.width.unwrap_or(1);
        if builtin_type(width).is_none() {
            return Err(CodegenError::generation(format!("bad size source width {width}")));
        }
        let read = format!("stream.{}()", read_method(Some(width)));
        let value = reverse(&self.options.byte_order, width, &read);
        method.push(format!("int {} = {}", field.name(), unsigned_size(width, &value)));
        Ok(())
    }

    fn load_simple(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let width = integer_width(self.schema, field.attribute)?;
        let read = format!("stream.{}()", read_method(Some(width)));
        method.push(format!(
            "obj.{}({})",
            setter_name(field.name()),
            reverse(&self.options.byte_order, width, &read)
        ));
        Ok(())
    }

    fn load_buffer(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let name = field.name();
        let size = match attribute_size(self.schema, field.attribute)? {
            SizeSpec::Fixed(size) => size.to_string(),
            SizeSpec::Field(source) => source,
        };
        method.push(format!("obj.{name} = ByteBuffer.allocate({size})"));
        method.push(format!("stream.{}(obj.{name}.array())", read_method(None)));
        Ok(())
    }

    fn load_array(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let name = field.name();
        let count = field.attribute.size_field().unwrap_or_default();
        let element = element_type(self.schema, self.options, field.attribute)?;
        method.push(format!(
            "java.util.ArrayList<{element}> {name} = new java.util.ArrayList<{element}>({count})"
        ));
        method.open(format!("for (int i = 0; i < {count}; i++)"));
        match array_element(self.schema, field.attribute)? {
            ElementKind::Integer(width) => {
                let read = format!("stream.{}()", read_method(Some(width)));
                method.push(format!(
                    "{name}.add({})",
                    reverse(&self.options.byte_order, width, &read)
                ));
            }
            ElementKind::Composite(_) => {
                method.push(format!("{name}.add({element}.loadFromBinary(stream))"));
            }
        }
        method.close();
        method.push(format!("obj.{}({name})", setter_name(name)));
        Ok(())
    }

    fn load_custom(&self, method: &mut MethodBuilder, field: &FlatField<'a>) {
        method.push(format!(
            "obj.{}({}.loadFromBinary(stream))",
            setter_name(field.name()),
            self.options.class_name(self.schema, &field.attribute.type_name)
        ));
    }

    fn serialize(&self) -> Result<MethodBuilder, CodegenError> {
        let mut method =
            MethodBuilder::new("public", "byte[]", "serialize", &[]).throws("throws Exception");
        method.push("ByteArrayOutputStream bos = new ByteArrayOutputStream()");
        method.push("DataOutputStream stream = new DataOutputStream(bos)");

        for field in &self.fields {
            if field.is_size_source() {
                self.serialize_size_source(&mut method, field)?;
                continue;
            }

            let guard = self.guard(field);
            if let Some(guard) = &guard {
                let expected = guard_literal(self.schema, self.options, &guard);
                method.open(format!("if (this.{}() == {})", getter_name(guard.field), expected));
            }
            match field.kind {
                AttributeKind::Simple => self.serialize_simple(&mut method, field)?,
                AttributeKind::Buffer => serialize_buffer(&mut method, field),
                AttributeKind::Array => self.serialize_array(&mut method, field)?,
                AttributeKind::Custom => serialize_custom(&mut method, field),
            }
            if guard.is_some() {
                // Primitive fields cannot be unset, so only references are checked.
                if field.kind != AttributeKind::Simple {
                    method.reopen(format!("else if (this.{} != null)", field.name()));
                    method.push(ILLEGAL_STATE);
                }
                method.close();
            }
        }

        method.push("stream.close()");
        method.push("return bos.toByteArray()");
        Ok(method)
    }

    fn serialize_size_source(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let width = field.width.unwrap_or(1);
        let java_type = builtin_type(width)
            .ok_or_else(|| CodegenError::generation(format!("bad size source width {width}")))?;
        let extension = if field.counts_elements() {
            ".size()"
        } else {
            ".array().length"
        };
        let layout = &self.descriptor.layout;
        let value = match field.dependent {
            // An absent conditional dependent is written as empty.
            Some(dependent) if resolve_guard(self.schema, layout, dependent).is_some() => {
                let name = &dependent.name;
                format!("({java_type})(this.{name} == null ? 0 : this.{name}{extension})")
            }
            Some(dependent) => format!("({java_type})this.{}{extension}", dependent.name),
            None => format!("({java_type})0"),
        };
        method.push(format!(
            "stream.{}({})",
            write_method(Some(width)),
            reverse(&self.options.byte_order, width, &value)
        ));
        Ok(())
    }

    fn serialize_simple(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let width = integer_width(self.schema, field.attribute)?;
        let value = format!("this.{}()", getter_name(field.name()));
        method.push(format!(
            "stream.{}({})",
            write_method(Some(width)),
            reverse(&self.options.byte_order, width, &value)
        ));
        Ok(())
    }

    fn serialize_array(
        &self,
        method: &mut MethodBuilder,
        field: &FlatField<'a>,
    ) -> Result<(), CodegenError> {
        let name = field.name();
        method.open(format!("for (int i = 0; i < this.{name}.size(); i++)"));
        match array_element(self.schema, field.attribute)? {
            ElementKind::Integer(width) => {
                let value = format!("this.{name}.get(i)");
                method.push(format!(
                    "stream.{}({})",
                    write_method(Some(width)),
                    reverse(&self.options.byte_order, width, &value)
                ));
            }
            ElementKind::Composite(_) => {
                method.push(format!("byte[] ser = this.{name}.get(i).serialize()"));
                method.push(format!("stream.{}(ser, 0, ser.length)", write_method(None)));
            }
        }
        method.close();
        Ok(())
    }
}

fn serialize_buffer(method: &mut MethodBuilder, field: &FlatField<'_>) {
    method.push(format!(
        "stream.{}(this.{1}.array(), 0, this.{1}.array().length)",
        write_method(None),
        field.name()
    ));
}

fn serialize_custom(method: &mut MethodBuilder, field: &FlatField<'_>) {
    let name = field.name();
    method.push(format!("byte[] {name} = this.{}().serialize()", getter_name(name)));
    method.push(format!("stream.{}({name}, 0, {name}.length)", write_method(None)));
}

fn add_method(output: &mut Vec<String>, method: &MethodBuilder) {
    output.extend(method.lines().iter().map(|line| {
        if line.is_empty() {
            String::new()
        } else {
            indent(line, 1)
        }
    }));
    output.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirebuild_schema::from_json_str;

    fn generate(json: &str, name: &str) -> Vec<String> {
        let schema = from_json_str(json).expect("Failed to parse");
        let options = GeneratorOptions::default();
        let mut registry = EnumRegistry::seed(&schema).expect("seed");
        let descriptor = schema.get_type(name).expect("type");
        let emitter =
            StructEmitter::new(&schema, &options, descriptor, &mut registry).expect("emitter");
        emitter.generate().expect("generate")
    }

    fn contains(lines: &[String], expected: &str) -> bool {
        lines.iter().any(|line| line.trim() == expected)
    }

    fn position(lines: &[String], expected: &str) -> usize {
        lines
            .iter()
            .position(|line| line.trim() == expected)
            .unwrap_or_else(|| panic!("missing line: {expected}"))
    }

    const MSG: &str = r#"{
        "Kind": {"type": "enum", "size": 1, "values": [{"name": "a", "value": 1}]},
        "Msg": {"type": "struct", "layout": [
            {"name": "kind", "type": "Kind"},
            {"name": "len", "type": "byte", "size": 4},
            {"name": "payload", "type": "byte", "size": "len"}
        ]}
    }"#;

    #[test]
    fn test_size_source_has_no_accessors() {
        let lines = generate(MSG, "Msg");
        assert!(!lines.iter().any(|l| l.contains("getLen")));
        assert!(!lines.iter().any(|l| l.contains("private int len")));
        assert!(contains(&lines, "private ByteBuffer payload;"));
        assert!(contains(&lines, "private Kind kind;"));
    }

    #[test]
    fn test_load_order_and_byte_order() {
        let lines = generate(MSG, "Msg");
        let kind = position(&lines, "obj.setKind(Kind.loadFromBinary(stream));");
        let len = position(
            &lines,
            "int len = Math.toIntExact(Integer.toUnsignedLong(Integer.reverseBytes(stream.readInt())));",
        );
        let alloc = position(&lines, "obj.payload = ByteBuffer.allocate(len);");
        let read = position(&lines, "stream.readFully(obj.payload.array());");
        assert!(kind < len && len < alloc && alloc < read);
    }

    #[test]
    fn test_serialize_derives_size_source() {
        let lines = generate(MSG, "Msg");
        let kind = position(&lines, "byte[] kind = this.getKind().serialize();");
        let len = position(
            &lines,
            "stream.writeInt(Integer.reverseBytes((int)this.payload.array().length));",
        );
        let payload = position(
            &lines,
            "stream.write(this.payload.array(), 0, this.payload.array().length);",
        );
        assert!(kind < len && len < payload);
    }

    #[test]
    fn test_fixed_buffer_setter_checks_length() {
        let lines = generate(
            r#"{"Key": {"type": "struct", "layout": [
                {"name": "key", "type": "byte", "size": 16}
            ]}}"#,
            "Key",
        );
        assert!(contains(&lines, "public void setKey(ByteBuffer key) {"));
        assert!(contains(&lines, "throw new NullPointerException(\"key\");"));
        assert!(contains(&lines, "if (key.array().length != 16)"));
        assert!(contains(
            &lines,
            "throw new IllegalArgumentException(\"key should be 16 bytes\");"
        ));
        assert!(contains(&lines, "obj.key = ByteBuffer.allocate(16);"));
    }

    #[test]
    fn test_array_of_structs() {
        let lines = generate(
            r#"{
                "Mosaic": {"type": "struct", "layout": [{"name": "amount", "type": "byte",
                    "size": 8}]},
                "Transfer": {"type": "struct", "layout": [
                    {"name": "mosaicsCount", "type": "byte", "size": 1},
                    {"name": "mosaics", "type": "Mosaic", "size": "mosaicsCount"}
                ]}
            }"#,
            "Transfer",
        );
        assert!(contains(&lines, "int mosaicsCount = Byte.toUnsignedInt(stream.readByte());"));
        assert!(contains(
            &lines,
            "java.util.ArrayList<MosaicBuilder> mosaics = new java.util.ArrayList<MosaicBuilder>(mosaicsCount);"
        ));
        assert!(contains(&lines, "for (int i = 0; i < mosaicsCount; i++) {"));
        assert!(contains(&lines, "mosaics.add(MosaicBuilder.loadFromBinary(stream));"));
        assert!(contains(&lines, "stream.writeByte((byte)this.mosaics.size());"));
        assert!(contains(&lines, "byte[] ser = this.mosaics.get(i).serialize();"));
    }

    #[test]
    fn test_inline_fields_share_order() {
        let lines = generate(
            r#"{
                "HeaderBody": {"type": "struct", "layout": [{"name": "version",
                    "type": "byte", "size": 2}]},
                "Msg": {"type": "struct", "layout": [
                    {"disposition": "inline", "type": "HeaderBody"},
                    {"name": "fee", "type": "byte", "size": 8}
                ]}
            }"#,
            "Msg",
        );
        let getter = position(&lines, "public short getVersion() {");
        let fee_getter = position(&lines, "public long getFee() {");
        let load = position(&lines, "obj.setVersion(Short.reverseBytes(stream.readShort()));");
        let load_fee = position(&lines, "obj.setFee(Long.reverseBytes(stream.readLong()));");
        let write = position(&lines, "stream.writeShort(Short.reverseBytes(this.getVersion()));");
        let write_fee = position(&lines, "stream.writeLong(Long.reverseBytes(this.getFee()));");
        assert!(getter < fee_getter && load < load_fee && write < write_fee);
    }

    #[test]
    fn test_conditional_field_guards() {
        let lines = generate(
            r#"{
                "LinkAction": {"type": "enum", "size": 1, "values": [{"name": "link", "value": 1}]},
                "HeaderBody": {"type": "struct", "layout": [{"name": "action",
                    "type": "LinkAction"}]},
                "Msg": {"type": "struct", "layout": [
                    {"disposition": "inline", "type": "HeaderBody"},
                    {"name": "target", "type": "byte", "size": 8, "condition": "action",
                        "condition_value": "link"},
                    {"name": "note", "type": "byte", "size": 3, "condition": "action",
                        "condition_value": "link"}
                ]}
            }"#,
            "Msg",
        );
        assert!(contains(&lines, "if (this.action != LinkAction.LINK)"));
        assert!(contains(&lines, "throw new java.lang.IllegalStateException();"));
        assert!(contains(&lines, "if (obj.getAction() == LinkAction.LINK) {"));
        assert!(contains(&lines, "if (this.getAction() == LinkAction.LINK) {"));
        assert!(contains(&lines, "} else if (this.note != null) {"));
        assert!(!lines.iter().any(|l| l.contains("this.target != null")));
    }

    #[test]
    fn test_class_frame() {
        let lines = generate(MSG, "Msg");
        assert_eq!(lines.first().map(String::as_str), Some("public class MsgBuilder {"));
        assert_eq!(lines.last().map(String::as_str), Some("}"));
        assert!(contains(
            &lines,
            "public static MsgBuilder loadFromBinary(DataInput stream) throws Exception {"
        ));
        assert!(contains(&lines, "public byte[] serialize() throws Exception {"));
    }

    #[test]
    fn test_size_sources_are_read_unsigned() {
        let lines = generate(
            r#"{"Blob": {"type": "struct", "layout": [
                {"name": "dataSize", "type": "byte", "size": 1},
                {"name": "data", "type": "byte", "size": "dataSize"},
                {"name": "itemsCount", "type": "byte", "size": 2},
                {"name": "items", "type": "byte", "size": "itemsCount"}
            ]}}"#,
            "Blob",
        );
        assert!(contains(&lines, "int dataSize = Byte.toUnsignedInt(stream.readByte());"));
        assert!(contains(&lines, "obj.data = ByteBuffer.allocate(dataSize);"));
        assert!(contains(
            &lines,
            "int itemsCount = Short.toUnsignedInt(Short.reverseBytes(stream.readShort()));"
        ));
        assert!(contains(
            &lines,
            "java.util.ArrayList<Byte> items = new java.util.ArrayList<Byte>(itemsCount);"
        ));
        assert!(contains(&lines, "for (int i = 0; i < itemsCount; i++) {"));
        assert!(!lines.iter().any(|l| l.contains("byte dataSize")));
    }

    #[test]
    fn test_conditional_dependent_size_defaults_to_zero() {
        let lines = generate(
            r#"{
                "Mode": {"type": "enum", "size": 1, "values": [{"name": "off",
                    "value": 0}, {"name": "on", "value": 1}]},
                "Msg": {"type": "struct", "layout": [
                    {"name": "mode", "type": "Mode"},
                    {"name": "noteSize", "type": "byte", "size": 1},
                    {"name": "note", "type": "byte", "size": "noteSize", "condition": "mode",
                        "condition_value": "on"}
                ]}
            }"#,
            "Msg",
        );
        assert!(contains(
            &lines,
            "stream.writeByte((byte)(this.note == null ? 0 : this.note.array().length));"
        ));
    }

    #[test]
    fn test_integer_guard_is_cast_to_width() {
        let lines = generate(
            r#"{"Msg": {"type": "struct", "layout": [
                {"name": "version", "type": "byte", "size": 1},
                {"name": "extra", "type": "byte", "size": 4, "condition": "version",
                    "condition_value": "0x80"}
            ]}}"#,
            "Msg",
        );
        assert!(contains(&lines, "if (obj.getVersion() == (byte)128) {"));
        assert!(contains(&lines, "if (this.version != (byte)128)"));
    }
}
