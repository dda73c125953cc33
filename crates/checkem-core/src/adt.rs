//! Allowed-data-type catalog: permitted leaf type names per nesting type.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CheckError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdtCatalog {
    types: HashMap<String, Vec<String>>,
}

impl AdtCatalog {
    /// Load the catalog from a JSON object of `nesting type -> [type names]`.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CheckError::io(path, e))?;
        let document: Value = serde_json::from_slice(&bytes).map_err(|e| CheckError::json(path, e))?;
        let catalog = Self::from_value(&document, path)?;
        info!(nesting_types = catalog.types.len(), "ADT catalog loaded");
        Ok(catalog)
    }

    /// Load the catalog when the file exists; a missing file means no catalog.
    pub async fn load_optional(path: &Path) -> Result<Option<Self>> {
        match tokio::fs::try_exists(path).await {
            Ok(true) => Self::load(path).await.map(Some),
            Ok(false) => {
                debug!(path = %path.display(), "no ADT catalog, type lists are not checked");
                Ok(None)
            }
            Err(e) => Err(CheckError::io(path, e)),
        }
    }

    pub fn from_value(document: &Value, path: &Path) -> Result<Self> {
        let entries = document
            .as_object()
            .ok_or_else(|| CheckError::InvalidCatalog {
                path: path.to_path_buf(),
                reason: "expected an object of type lists".into(),
            })?;

        let mut types = HashMap::with_capacity(entries.len());
        for (nest, allowed) in entries {
            let list = allowed
                .as_array()
                .ok_or_else(|| CheckError::InvalidCatalog {
                    path: path.to_path_buf(),
                    reason: format!("\"{nest}\" is not a list"),
                })?;
            let names = list
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| CheckError::InvalidCatalog {
                        path: path.to_path_buf(),
                        reason: format!("\"{nest}\" contains a non-string type name"),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            types.insert(nest.clone(), names);
        }
        Ok(Self::from_lists(types))
    }

    /// Build a catalog from unsorted lists.
    pub fn from_lists(mut types: HashMap<String, Vec<String>>) -> Self {
        for names in types.values_mut() {
            names.sort();
        }
        Self { types }
    }

    /// Sorted type list for a nesting type, if the catalog has one.
    pub fn allowed(&self, nest: &str) -> Option<&[String]> {
        self.types.get(nest).map(Vec::as_slice)
    }
}

/// Whether `name` is in a sorted type list.
pub fn is_allowed(allowed: &[String], name: &str) -> bool {
    allowed
        .binary_search_by(|candidate| candidate.as_str().cmp(name))
        .is_ok()
}
