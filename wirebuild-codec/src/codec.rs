//! Reference codec.

use crate::error::{CodecError, Result};
use std::collections::HashMap;
use wirebuild_core::{ByteOrderPolicy, Record, Value, WireError, WireReader, WireWriter};
use wirebuild_schema::classify::is_simple_width;
use wirebuild_schema::{
    AttributeKind, ElementKind, EnumEntry, EnumRegistry, EnumTable, FlatField, Guard, GuardValue,
    Schema, SizeSpec, TypeDescriptor, TypeKind, array_element, attribute_size, fixed_width,
    flatten, resolve_guard,
};

/// How struct names map to enum member names contributed by const
/// attributes, and which structs are inline-only helpers.
///
/// The default matches the generator's default naming, so decoded enum
/// members carry the same names as the generated enum constants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    /// Suffix appended to a struct name to form its member name.
    pub type_suffix: String,
    /// Structs ending with this suffix contribute no members of their own.
    pub helper_suffix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            type_suffix: "Builder".to_string(),
            helper_suffix: "Body".to_string(),
        }
    }
}

impl Naming {
    /// Member names equal struct names and no struct is a helper.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            type_suffix: String::new(),
            helper_suffix: String::new(),
        }
    }

    fn owner(&self, struct_name: &str) -> String {
        format!("{}{}", struct_name, self.type_suffix)
    }

    fn is_helper(&self, struct_name: &str) -> bool {
        !self.helper_suffix.is_empty() && struct_name.ends_with(&self.helper_suffix)
    }
}

/// Decodes and encodes schema types as [`Value`] trees.
pub struct Codec<'a> {
    schema: &'a Schema,
    policy: ByteOrderPolicy,
    layouts: HashMap<&'a str, Vec<FlatField<'a>>>,
    enums: EnumTable,
}

impl<'a> Codec<'a> {
    /// Resolves every struct of the schema with the default naming.
    ///
    /// # Errors
    /// Returns `CodecError::Schema` if the schema does not resolve.
    pub fn new(schema: &'a Schema, policy: ByteOrderPolicy) -> Result<Self> {
        Self::with_naming(schema, policy, &Naming::default())
    }

    /// Resolves every struct of the schema.
    ///
    /// Enum membership is accumulated exactly as a generation run does it:
    /// declared values first, then const contributions of non-helper structs
    /// in schema order. Helper structs get no layout of their own.
    ///
    /// # Errors
    /// Returns `CodecError::Schema` if the schema does not resolve.
    pub fn with_naming(
        schema: &'a Schema,
        policy: ByteOrderPolicy,
        naming: &Naming,
    ) -> Result<Self> {
        let mut registry = EnumRegistry::seed(schema)?;
        let mut layouts = HashMap::new();

        for descriptor in schema.iter().filter(|d| d.is_struct()) {
            // Helpers only exist inlined into their parents.
            if naming.is_helper(&descriptor.name) {
                tracing::trace!(name = %descriptor.name, "skipping inline helper struct");
                continue;
            }
            let owner = naming.owner(&descriptor.name);
            let fields = flatten(schema, descriptor, &owner, &mut registry)?;
            layouts.insert(descriptor.name.as_str(), fields);
        }

        let enums = registry.finish();
        tracing::debug!(structs = layouts.len(), enums = enums.len(), "codec ready");
        Ok(Self {
            schema,
            policy,
            layouts,
            enums,
        })
    }

    /// Byte order policy applied to every multi-byte integer.
    #[must_use]
    pub const fn policy(&self) -> ByteOrderPolicy {
        self.policy
    }

    /// Enum membership after const contributions.
    #[must_use]
    pub fn enums(&self) -> &EnumTable {
        &self.enums
    }

    /// Flattened fields of a struct, in wire order.
    #[must_use]
    pub fn fields(&self, struct_name: &str) -> Option<&[FlatField<'a>]> {
        self.layouts.get(struct_name).map(Vec::as_slice)
    }

    /// Decodes one instance of `type_name` from the start of `bytes`.
    /// Trailing bytes are left unread.
    ///
    /// # Arguments
    /// * `type_name` - Struct, enum or primitive name
    /// * `bytes` - Encoded input
    ///
    /// # Returns
    /// A `Value::Record` for structs, `Value::Enum` for enums and
    /// `Value::Int` or `Value::Bytes` for primitives.
    ///
    /// # Errors
    /// Returns `WireError::UnexpectedEof` on short input and
    /// `WireError::Decode` for enum values without a member.
    pub fn decode(&self, type_name: &str, bytes: &[u8]) -> Result<Value> {
        let mut reader = WireReader::new(bytes, self.policy);
        let value = self.read_type(type_name, &mut reader)?;
        if reader.remaining() > 0 {
            tracing::trace!(
                type_name,
                trailing = reader.remaining(),
                "trailing bytes after decode"
            );
        }
        Ok(value)
    }

    /// Encodes `value` as an instance of `type_name`.
    ///
    /// # Arguments
    /// * `type_name` - Struct, enum or primitive name
    /// * `value` - Value shaped as `decode` returns it; size sources are derived
    ///
    /// # Errors
    /// Returns `WireError::InvalidState` when a conditional field is set
    /// while its guard does not hold, `WireError::MissingField` when a
    /// present field is unset, and `WireError::InvalidArgument` or
    /// `WireError::TypeMismatch` for values that violate their field.
    pub fn encode(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let mut writer = WireWriter::new(self.policy);
        self.write_type(type_name, value, &mut writer)?;
        Ok(writer.finish())
    }

    /// Assigns a stored field through its accessor contract: the guard
    /// must hold, and buffers must have their fixed length.
    ///
    /// # Errors
    /// Returns `WireError::InvalidState`, `WireError::InvalidArgument` or
    /// `WireError::TypeMismatch`.
    pub fn set_field(
        &self,
        struct_name: &str,
        record: &mut Record,
        field: &str,
        value: Value,
    ) -> Result<()> {
        let (descriptor, flat) = self.stored_field(struct_name, field)?;
        self.check_guard(descriptor, flat, record)?;
        self.check_value(flat, &value)?;
        record.insert(field, value);
        Ok(())
    }

    /// Reads a stored field through its accessor contract.
    ///
    /// # Errors
    /// Returns `WireError::InvalidState` if the guard does not hold and
    /// `WireError::MissingField` if the field is unset.
    pub fn get_field<'r>(
        &self,
        struct_name: &str,
        record: &'r Record,
        field: &str,
    ) -> Result<&'r Value> {
        let (descriptor, flat) = self.stored_field(struct_name, field)?;
        self.check_guard(descriptor, flat, record)?;
        record.get(field).ok_or_else(|| {
            WireError::MissingField {
                type_name: struct_name.to_string(),
                field: field.to_string(),
            }
            .into()
        })
    }

    /// Looks up the member of `enum_name` backed by `value`.
    ///
    /// # Errors
    /// Returns `WireError::Decode` if no member has that value.
    pub fn enum_member(&self, enum_name: &str, value: u64) -> Result<Value> {
        let entry = self.enum_entry(enum_name)?;
        member_value(entry, value)
    }

    fn descriptor(&self, name: &str) -> Result<&'a TypeDescriptor> {
        self.schema.get_type(name).ok_or_else(|| unknown_type(name))
    }

    fn layout(&self, name: &str) -> Result<&[FlatField<'a>]> {
        self.fields(name).ok_or_else(|| unknown_type(name))
    }

    fn enum_entry(&self, name: &str) -> Result<&EnumEntry> {
        self.enums.get(name).ok_or_else(|| unknown_type(name))
    }

    fn stored_field(
        &self,
        struct_name: &str,
        field: &str,
    ) -> Result<(&'a TypeDescriptor, &FlatField<'a>)> {
        let descriptor = self.descriptor(struct_name)?;
        let flat = self
            .layout(struct_name)?
            .iter()
            .find(|f| !f.is_size_source() && f.name() == field)
            .ok_or_else(|| {
                WireError::invalid_argument(field, format!("'{struct_name}' has no such field"))
            })?;
        Ok((descriptor, flat))
    }

    fn guard(&self, descriptor: &'a TypeDescriptor, field: &FlatField<'a>) -> Option<Guard<'a>> {
        resolve_guard(self.schema, &descriptor.layout, field.attribute)
    }

    fn check_guard(
        &self,
        descriptor: &'a TypeDescriptor,
        field: &FlatField<'a>,
        record: &Record,
    ) -> Result<()> {
        match self.guard(descriptor, field) {
            Some(guard) if !guard_holds(&guard, record) => {
                Err(invalid_state(field.name(), &guard).into())
            }
            _ => Ok(()),
        }
    }

    fn check_value(&self, field: &FlatField<'a>, value: &Value) -> Result<()> {
        let name = field.name();
        match field.kind {
            AttributeKind::Simple => {
                let x = value.as_int().ok_or_else(|| WireError::type_mismatch(name, "integer"))?;
                check_fits(name, self.simple_width(field)?, x)?;
            }
            AttributeKind::Buffer => {
                let bytes = value
                    .as_bytes()
                    .ok_or_else(|| WireError::type_mismatch(name, "bytes"))?;
                self.check_buffer_length(field, bytes)?;
            }
            AttributeKind::Array => {
                value.as_list().ok_or_else(|| WireError::type_mismatch(name, "list"))?;
            }
            AttributeKind::Custom => {
                let descriptor = self.descriptor(&field.attribute.type_name)?;
                match descriptor.kind {
                    TypeKind::Enum => {
                        let member = value
                            .as_enum()
                            .ok_or_else(|| WireError::type_mismatch(name, "enum member"))?;
                        let entry = self.enum_entry(&descriptor.name)?;
                        if entry.find_by_name(member).is_none() {
                            let message = format!("'{member}' is not a member of {}", entry.name);
                            return Err(WireError::invalid_argument(name, message).into());
                        }
                    }
                    _ => {
                        value.as_record().ok_or_else(|| WireError::type_mismatch(name, "record"))?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_buffer_length(&self, field: &FlatField<'a>, bytes: &[u8]) -> Result<()> {
        if let SizeSpec::Fixed(size) = attribute_size(self.schema, field.attribute)? {
            if bytes.len() as u64 != size {
                let name = field.name();
                let message = format!("{name} should be {size} bytes");
                return Err(WireError::invalid_argument(name, message).into());
            }
        }
        Ok(())
    }

    fn simple_width(&self, field: &FlatField<'a>) -> Result<u64> {
        fixed_width(self.schema, field.attribute)?
            .filter(|w| is_simple_width(*w))
            .ok_or_else(|| WireError::type_mismatch(field.name(), "fixed-width integer").into())
    }

    fn read_type(&self, name: &str, reader: &mut WireReader<'_>) -> Result<Value> {
        let descriptor = self.descriptor(name)?;
        match descriptor.kind {
            TypeKind::Struct => Ok(Value::Record(self.read_struct(descriptor, reader)?)),
            TypeKind::Enum => {
                let entry = self.enum_entry(name)?;
                let raw = reader.read_uint(entry.width as usize)?;
                member_value(entry, raw)
            }
            TypeKind::Primitive => {
                let width = descriptor.size.unwrap_or(1);
                if is_simple_width(width) {
                    Ok(Value::Int(reader.read_uint(width as usize)?))
                } else {
                    Ok(Value::Bytes(reader.read_bytes(width as usize)?))
                }
            }
        }
    }

    fn read_struct(
        &self,
        descriptor: &'a TypeDescriptor,
        reader: &mut WireReader<'_>,
    ) -> Result<Record> {
        let mut record = Record::new();
        let mut lengths: HashMap<&str, u64> = HashMap::new();

        for field in self.layout(&descriptor.name)? {
            let name = field.name();
            if field.is_size_source() {
                let width = field.width.unwrap_or(1);
                lengths.insert(name, reader.read_uint(width as usize)?);
                continue;
            }
            if let Some(guard) = self.guard(descriptor, field) {
                if !guard_holds(&guard, &record) {
                    continue;
                }
            }

            let value = match field.kind {
                AttributeKind::Simple => {
                    Value::Int(reader.read_uint(self.simple_width(field)? as usize)?)
                }
                AttributeKind::Buffer => {
                    let len = self.length(descriptor, field, &lengths)?;
                    Value::Bytes(reader.read_bytes(len)?)
                }
                AttributeKind::Array => {
                    let count = self.length(descriptor, field, &lengths)?;
                    let mut items = Vec::with_capacity(count.min(reader.remaining()));
                    for _ in 0..count {
                        items.push(self.read_element(field, reader)?);
                    }
                    Value::List(items)
                }
                AttributeKind::Custom => self.read_type(&field.attribute.type_name, reader)?,
            };
            record.insert(name, value);
        }
        Ok(record)
    }

    fn length(
        &self,
        descriptor: &TypeDescriptor,
        field: &FlatField<'a>,
        lengths: &HashMap<&str, u64>,
    ) -> Result<usize> {
        match attribute_size(self.schema, field.attribute)? {
            SizeSpec::Fixed(size) => Ok(size as usize),
            SizeSpec::Field(source) => match lengths.get(source.as_str()) {
                Some(length) => Ok(*length as usize),
                None => Err(WireError::MissingField {
                    type_name: descriptor.name.clone(),
                    field: source,
                }
                .into()),
            },
        }
    }

    fn read_element(&self, field: &FlatField<'a>, reader: &mut WireReader<'_>) -> Result<Value> {
        match array_element(self.schema, field.attribute)? {
            ElementKind::Integer(width) => Ok(Value::Int(reader.read_uint(width as usize)?)),
            ElementKind::Composite(element) => self.read_type(&element.name, reader),
        }
    }

    fn write_type(&self, name: &str, value: &Value, writer: &mut WireWriter) -> Result<()> {
        let descriptor = self.descriptor(name)?;
        match descriptor.kind {
            TypeKind::Struct => {
                let record = value
                    .as_record()
                    .ok_or_else(|| WireError::type_mismatch(name, "record"))?;
                self.write_struct(descriptor, record, writer)
            }
            TypeKind::Enum => {
                let entry = self.enum_entry(name)?;
                let member_name = value
                    .as_enum()
                    .ok_or_else(|| WireError::type_mismatch(name, "enum member"))?;
                let member = entry.find_by_name(member_name).ok_or_else(|| {
                    let message = format!("'{member_name}' is not a member of {name}");
                    WireError::invalid_argument(name, message)
                })?;
                writer.write_uint(entry.width as usize, member.value);
                Ok(())
            }
            TypeKind::Primitive => {
                let width = descriptor.size.unwrap_or(1);
                if is_simple_width(width) {
                    let x = value
                        .as_int()
                        .ok_or_else(|| WireError::type_mismatch(name, "integer"))?;
                    check_fits(name, width, x)?;
                    writer.write_uint(width as usize, x);
                } else {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| WireError::type_mismatch(name, "bytes"))?;
                    if bytes.len() as u64 != width {
                        let message = format!("{name} should be {width} bytes");
                        return Err(WireError::invalid_argument(name, message).into());
                    }
                    writer.write_bytes(bytes);
                }
                Ok(())
            }
        }
    }

    fn write_struct(
        &self,
        descriptor: &'a TypeDescriptor,
        record: &Record,
        writer: &mut WireWriter,
    ) -> Result<()> {
        for field in self.layout(&descriptor.name)? {
            let name = field.name();
            if field.is_size_source() {
                let width = field.width.unwrap_or(1);
                let length = self.derived_length(descriptor, field, record)?;
                check_fits(name, width, length)?;
                writer.write_uint(width as usize, length);
                continue;
            }
            if let Some(guard) = self.guard(descriptor, field) {
                if !guard_holds(&guard, record) {
                    if record.contains(name) {
                        return Err(invalid_state(name, &guard).into());
                    }
                    continue;
                }
            }

            let value = record.get(name).ok_or_else(|| WireError::MissingField {
                type_name: descriptor.name.clone(),
                field: name.to_string(),
            })?;
            match field.kind {
                AttributeKind::Simple => {
                    let width = self.simple_width(field)?;
                    let x = value
                        .as_int()
                        .ok_or_else(|| WireError::type_mismatch(name, "integer"))?;
                    check_fits(name, width, x)?;
                    writer.write_uint(width as usize, x);
                }
                AttributeKind::Buffer => {
                    let bytes = value
                        .as_bytes()
                        .ok_or_else(|| WireError::type_mismatch(name, "bytes"))?;
                    self.check_buffer_length(field, bytes)?;
                    writer.write_bytes(bytes);
                }
                AttributeKind::Array => {
                    let items = value
                        .as_list()
                        .ok_or_else(|| WireError::type_mismatch(name, "list"))?;
                    for item in items {
                        self.write_element(field, item, writer)?;
                    }
                }
                AttributeKind::Custom => {
                    self.write_type(&field.attribute.type_name, value, writer)?;
                }
            }
        }
        Ok(())
    }

    /// Count or byte length of a size source's dependent. An absent
    /// dependent whose own guard does not hold counts as empty.
    fn derived_length(
        &self,
        descriptor: &'a TypeDescriptor,
        field: &FlatField<'a>,
        record: &Record,
    ) -> Result<u64> {
        let Some(dependent) = field.dependent else {
            return Ok(0);
        };
        let name = dependent.name.as_str();
        match record.get(name) {
            Some(value) if field.counts_elements() => value
                .as_list()
                .map(|items| items.len() as u64)
                .ok_or_else(|| WireError::type_mismatch(name, "list").into()),
            Some(value) => value
                .as_bytes()
                .map(|bytes| bytes.len() as u64)
                .ok_or_else(|| WireError::type_mismatch(name, "bytes").into()),
            None => {
                let guarded_off = resolve_guard(self.schema, &descriptor.layout, dependent)
                    .is_some_and(|guard| !guard_holds(&guard, record));
                if guarded_off {
                    Ok(0)
                } else {
                    Err(WireError::MissingField {
                        type_name: descriptor.name.clone(),
                        field: name.to_string(),
                    }
                    .into())
                }
            }
        }
    }

    fn write_element(
        &self,
        field: &FlatField<'a>,
        item: &Value,
        writer: &mut WireWriter,
    ) -> Result<()> {
        match array_element(self.schema, field.attribute)? {
            ElementKind::Integer(width) => {
                let name = field.name();
                let x = item.as_int().ok_or_else(|| WireError::type_mismatch(name, "integer"))?;
                check_fits(name, width, x)?;
                writer.write_uint(width as usize, x);
                Ok(())
            }
            ElementKind::Composite(element) => self.write_type(&element.name, item, writer),
        }
    }
}

fn unknown_type(name: &str) -> CodecError {
    WireError::UnknownType {
        name: name.to_string(),
    }
    .into()
}

fn member_value(entry: &EnumEntry, raw: u64) -> Result<Value> {
    entry
        .find_by_value(raw)
        .map(|member| Value::Enum(member.name.to_uppercase()))
        .ok_or_else(|| {
            WireError::Decode {
                enum_name: entry.name.clone(),
                value: raw,
            }
            .into()
        })
}

fn guard_holds(guard: &Guard<'_>, record: &Record) -> bool {
    match (&guard.expected, record.get(guard.field)) {
        (GuardValue::Member { member, .. }, Some(Value::Enum(current))) => {
            current.to_uppercase() == *member
        }
        (GuardValue::Literal(_), Some(Value::Int(current))) => {
            guard.expected.literal_value() == Some(*current)
        }
        _ => false,
    }
}

fn invalid_state(field: &str, guard: &Guard<'_>) -> WireError {
    let expected = match &guard.expected {
        GuardValue::Member { enum_name, member } => format!("{enum_name}.{member}"),
        GuardValue::Literal(text) => text.clone(),
    };
    WireError::InvalidState {
        field: field.to_string(),
        condition: guard.field.to_string(),
        expected,
    }
}

fn check_fits(field: &str, width: u64, value: u64) -> std::result::Result<(), WireError> {
    if width >= 8 || value >> (width * 8) == 0 {
        Ok(())
    } else {
        let message = format!("value {value} does not fit in {width} bytes");
        Err(WireError::invalid_argument(field, message))
    }
}
