use std::collections::HashMap;

use crate::adt::{is_allowed, AdtCatalog};
use crate::mapping::{MappingDeclaration, MappingValue, Nesting, NestingDefect, NestingEntry};
use crate::metadata::MetadataFields;
use crate::schema::{SchemaField, SchemaStore};
use crate::types::Diagnostic;

/// Read-only stores a mapping file is checked against.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub schemas: &'a SchemaStore,
    pub adt: Option<&'a AdtCatalog>,
}

/// Check one mapping declaration of `resource` and return its diagnostics.
///
/// `metadata` is this file's private copy; it is consumed because the
/// coverage flags only mean something for this run.
pub fn validate(
    mapping: &MappingDeclaration,
    resource: &str,
    ctx: ValidationContext<'_>,
    metadata: MetadataFields,
) -> Vec<Diagnostic> {
    let mut run = FileRun {
        resource,
        ctx,
        metadata,
        claimed: HashMap::new(),
        diagnostics: Vec::new(),
    };

    for (key, value) in mapping.iter() {
        match value {
            MappingValue::Leaf(target) => run.check_leaf(key, target),
            MappingValue::Nesting(nesting) => run.check_nesting(key, nesting),
            MappingValue::MalformedNesting(NestingDefect::MissingType) => {
                run.flag(key, format!("Nesting {key} is missing the custom type"));
            }
            MappingValue::MalformedNesting(NestingDefect::MissingMappings) => {
                run.flag(key, format!("Nesting {key} is missing mappings"));
            }
            MappingValue::Unknown => run.flag(key, "Unknown mapping"),
        }
    }

    run.finish()
}

/// Working state owned by a single mapping file's validation.
struct FileRun<'a> {
    resource: &'a str,
    ctx: ValidationContext<'a>,
    metadata: MetadataFields,
    /// Leaf target -> first key that mapped to it.
    claimed: HashMap<&'a str, &'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> FileRun<'a> {
    fn flag(&mut self, key: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::keyed(key, message));
    }

    fn check_leaf(&mut self, key: &'a str, target: &'a str) {
        if target.is_empty() {
            return;
        }

        if !self.metadata.mark_covered(key) {
            self.flag(key, "not in metadata");
        }

        let schemas = self.ctx.schemas;
        match schemas.field(self.resource, target) {
            None => self.flag(
                key,
                format!(
                    "{target} is not in {}'s standard nor custom schema",
                    self.resource
                ),
            ),
            Some(field) if field.nested => self.flag(
                key,
                format!("is supposed to be a nest but was mapped to {target}"),
            ),
            Some(_) => {}
        }

        match self.claimed.get(target) {
            Some(first) => {
                let first = *first;
                self.flag(key, format!("{target} is repeated with {first}"));
            }
            None => {
                self.claimed.insert(target, key);
            }
        }
    }

    fn check_nesting(&mut self, key: &str, nesting: &Nesting) {
        let nest = nesting.type_name.as_str();
        let schemas = self.ctx.schemas;
        let schema: Option<&SchemaField> = schemas
            .custom_field(self.resource, nest)
            .filter(|field| field.nested);
        if schema.is_none() {
            self.flag(key, format!("Nesting {key} has an invalid nesting {nest}"));
        }

        let mut has_name = false;
        let mut has_type = false;
        let mut has_itself = false;

        for (field, entry) in &nesting.entries {
            match entry {
                NestingEntry::Name => has_name = true,
                NestingEntry::Type(types) => {
                    has_type = true;
                    self.check_type_list(key, nest, types.as_deref());
                }
                NestingEntry::Field(target) => {
                    if !self.metadata.mark_covered(field) {
                        self.flag(key, format!("{field} not in metadata"));
                    }
                    if field == key {
                        has_itself = true;
                    }
                    match target {
                        Some(target) if schema.is_some_and(|s| s.has_property(target)) => {}
                        Some(target) => self.flag(
                            key,
                            format!(
                                "Nested property {field} has an invalid nesting {target} for {nest}"
                            ),
                        ),
                        None => self.flag(
                            key,
                            format!("Nested property {field} has a non-string nesting for {nest}"),
                        ),
                    }
                }
            }
        }

        if !has_name {
            self.flag(key, "Missing Name inside nesting");
        }
        if !has_type {
            self.flag(key, "Missing Type inside nesting");
        }
        if !has_itself {
            self.flag(key, "Missing itself inside nesting");
        }
    }

    fn check_type_list(&mut self, key: &str, nest: &str, types: Option<&str>) {
        let Some(types) = types else {
            self.flag(key, format!("Nesting {key} has empty Type"));
            return;
        };
        let Some(allowed) = self.ctx.adt.and_then(|adt| adt.allowed(nest)) else {
            return;
        };
        for element in types.split(',').map(str::trim) {
            if !is_allowed(allowed, element) {
                self.flag(
                    key,
                    format!("Nesting {key} has invalid Type {element} for {nest}"),
                );
            }
        }
    }

    fn finish(mut self) -> Vec<Diagnostic> {
        let uncovered: Vec<Diagnostic> = self
            .metadata
            .uncovered()
            .map(|field| Diagnostic::keyed(field, "Not found in mappings"))
            .collect();
        self.diagnostics.extend(uncovered);
        self.diagnostics
    }
}
