//! Two-phase generation driver.
//!
//! Structs are generated first, in schema order; each one may add members to
//! an enum through its const attributes. Enums are generated only after the
//! last struct, from the frozen enum table.

use crate::error::CodegenError;
use crate::java::{EnumEmitter, StructEmitter};
use crate::options::GeneratorOptions;
use wirebuild_schema::{EnumRegistry, EnumTable, Schema};

/// Name and source lines of one generated type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    /// Generated type name.
    pub name: String,
    /// Source lines, without file framing.
    pub lines: Vec<String>,
}

/// Generator for a whole schema.
pub struct Generator<'a> {
    schema: &'a Schema,
    options: &'a GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    #[must_use]
    pub fn new(schema: &'a Schema, options: &'a GeneratorOptions) -> Self {
        Self { schema, options }
    }

    /// Generates every struct and enum type: structs in schema order, then
    /// declared enums in schema order, then enums only known from const
    /// attributes.
    ///
    /// # Errors
    /// Returns the first schema resolution or generation failure; no partial
    /// output is returned.
    pub fn generate(&self) -> Result<Vec<GeneratedType>, CodegenError> {
        let mut registry = EnumRegistry::seed(self.schema)?;
        let mut output = self.generate_structs(&mut registry)?;
        let table = registry.finish();
        output.extend(self.generate_enums(&table)?);
        tracing::info!(types = output.len(), "generation complete");
        Ok(output)
    }

    fn generate_structs(
        &self,
        registry: &mut EnumRegistry,
    ) -> Result<Vec<GeneratedType>, CodegenError> {
        let mut output = Vec::new();
        for descriptor in self.schema.iter().filter(|d| d.is_struct()) {
            if self.options.is_helper(&descriptor.name) {
                tracing::debug!(name = %descriptor.name, "skipping inline helper struct");
                continue;
            }
            let emitter = StructEmitter::new(self.schema, self.options, descriptor, registry)?;
            let lines = emitter.generate()?;
            tracing::debug!(name = emitter.class_name(), lines = lines.len(), "generated struct");
            output.push(GeneratedType {
                name: emitter.class_name().to_string(),
                lines,
            });
        }
        Ok(output)
    }

    fn generate_enums(&self, table: &EnumTable) -> Result<Vec<GeneratedType>, CodegenError> {
        let mut output = Vec::with_capacity(table.len());
        for entry in table.iter() {
            if !entry.declared {
                tracing::warn!(name = %entry.name, "enum is only defined by const attributes");
            }
            let emitter = EnumEmitter::new(entry, self.options);
            let lines = emitter.generate()?;
            tracing::debug!(name = %entry.name, members = entry.members.len(), "generated enum");
            output.push(GeneratedType {
                name: emitter.enum_name().to_string(),
                lines,
            });
        }
        Ok(output)
    }
}
