//! Schema store: standard and custom field definitions per resource type.
//!
//! Standard documents are index mappings (`mappings._doc.properties`),
//! custom documents carry their fields at top-level `properties`. Only two
//! facts are kept per field: whether it is a nest, and which property names
//! the nest accepts.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::catalogs::NESTED_TYPE;
use crate::config::{Config, SchemaLayer};
use crate::error::{CheckError, Result};

const STANDARD_PROPERTIES_POINTER: &str = "/mappings/_doc/properties";
const CUSTOM_PROPERTIES_POINTER: &str = "/properties";

/// One declared schema field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaField {
    pub nested: bool,
    /// Accepted nested property names; empty unless `nested`.
    pub properties: HashSet<String>,
}

impl SchemaField {
    pub fn leaf() -> Self {
        Self::default()
    }

    pub fn nest<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nested: true,
            properties: properties.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains(name)
    }
}

/// Field name -> definition for one resource type and one layer.
pub type ResourceSchema = HashMap<String, SchemaField>;

/// Immutable once built; shared read-only by every validation task.
#[derive(Debug, Clone, Default)]
pub struct SchemaStore {
    standard: HashMap<String, ResourceSchema>,
    custom: HashMap<String, ResourceSchema>,
}

impl SchemaStore {
    /// Load both layers for every configured resource type.
    ///
    /// One task per document; all tasks are joined before returning, and
    /// the first failure in submission order fails the whole store.
    pub async fn load(config: &Config) -> Result<Self> {
        let mut handles = Vec::with_capacity(config.resources.len() * 2);
        for resource in &config.resources {
            for layer in [SchemaLayer::Standard, SchemaLayer::Custom] {
                let path = config.schema_path(resource, layer);
                let task = tokio::spawn(async move { load_document(path, layer).await });
                handles.push((resource.name.clone(), layer, task));
            }
        }

        let mut store = Self::default();
        let mut first_error = None;
        for (resource, layer, task) in handles {
            let outcome = task
                .await
                .map_err(|e| CheckError::Task(format!("loading {resource} schema: {e}")))
                .and_then(|loaded| loaded);
            match outcome {
                Ok(schema) => store.insert(layer, resource, schema),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }
        info!(
            resources = store.standard.len(),
            standard_fields = store.standard.values().map(HashMap::len).sum::<usize>(),
            custom_fields = store.custom.values().map(HashMap::len).sum::<usize>(),
            "schema store loaded"
        );
        Ok(store)
    }

    pub fn insert(
        &mut self,
        layer: SchemaLayer,
        resource: impl Into<String>,
        schema: ResourceSchema,
    ) {
        let target = match layer {
            SchemaLayer::Standard => &mut self.standard,
            SchemaLayer::Custom => &mut self.custom,
        };
        target.insert(resource.into(), schema);
    }

    /// Look a field up in the custom layer, falling back to standard.
    pub fn field(&self, resource: &str, name: &str) -> Option<&SchemaField> {
        self.custom_field(resource, name)
            .or_else(|| self.standard_field(resource, name))
    }

    pub fn custom_field(&self, resource: &str, name: &str) -> Option<&SchemaField> {
        self.custom.get(resource)?.get(name)
    }

    pub fn standard_field(&self, resource: &str, name: &str) -> Option<&SchemaField> {
        self.standard.get(resource)?.get(name)
    }
}

async fn load_document(path: PathBuf, layer: SchemaLayer) -> Result<ResourceSchema> {
    debug!(path = %path.display(), layer = layer.as_str(), "reading schema");
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| CheckError::io(&path, e))?;
    let document: Value =
        serde_json::from_slice(&bytes).map_err(|e| CheckError::json(&path, e))?;
    parse_document(&document, layer, &path)
}

/// Extract field definitions from a parsed schema document.
pub fn parse_document(document: &Value, layer: SchemaLayer, path: &Path) -> Result<ResourceSchema> {
    let pointer = match layer {
        SchemaLayer::Standard => STANDARD_PROPERTIES_POINTER,
        SchemaLayer::Custom => CUSTOM_PROPERTIES_POINTER,
    };
    let properties = document
        .pointer(pointer)
        .and_then(Value::as_object)
        .ok_or_else(|| CheckError::InvalidSchema {
            path: path.to_path_buf(),
            reason: format!("missing object at {pointer}"),
        })?;
    parse_properties(properties, path)
}

fn parse_properties(properties: &Map<String, Value>, path: &Path) -> Result<ResourceSchema> {
    let mut schema = ResourceSchema::with_capacity(properties.len());
    for (name, definition) in properties {
        let definition = definition
            .as_object()
            .ok_or_else(|| CheckError::InvalidSchema {
                path: path.to_path_buf(),
                reason: format!("field \"{name}\" is not an object"),
            })?;

        let nested = definition.get("type").and_then(Value::as_str) == Some(NESTED_TYPE);
        let field = if nested {
            let nested_properties = definition
                .get("properties")
                .and_then(Value::as_object)
                .map(|p| p.keys().cloned().collect())
                .unwrap_or_default();
            SchemaField {
                nested,
                properties: nested_properties,
            }
        } else {
            SchemaField::leaf()
        };
        schema.insert(name.clone(), field);
    }
    Ok(schema)
}
