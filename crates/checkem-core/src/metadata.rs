//! Metadata field sets: the fields a data source supplies for a resource class.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{CheckError, Result};

/// Expected field names with a "covered" flag, in sorted order.
///
/// Each mapping file validates against its own copy; the flags record which
/// fields the file referenced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataFields {
    fields: BTreeMap<String, bool>,
}

impl MetadataFields {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(|n| (n.into(), false)).collect(),
        }
    }

    /// Parse a metadata CSV: the first column of every row, taken as read,
    /// with `sentinel` (the header's first cell) excluded.
    pub fn from_csv(content: &[u8], sentinel: &str, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content);

        let mut fields = BTreeMap::new();
        for record in reader.records() {
            let record = record.map_err(|source| CheckError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            if let Some(name) = record.get(0) {
                fields.insert(name.to_string(), false);
            }
        }
        fields.remove(sentinel);
        Ok(Self { fields })
    }

    /// Mark a field as referenced. Returns false when it is not a metadata field.
    pub fn mark_covered(&mut self, name: &str) -> bool {
        match self.fields.get_mut(name) {
            Some(covered) => {
                *covered = true;
                true
            }
            None => false,
        }
    }

    /// Fields no mapping referenced, in sorted order.
    pub fn uncovered(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, covered)| !**covered)
            .map(|(name, _)| name.as_str())
    }
}

/// Locates and loads the metadata CSV for a mapping file.
#[derive(Debug, Clone)]
pub struct MetadataIndex {
    config: Config,
    board: String,
}

impl MetadataIndex {
    pub fn new(config: Config, board: impl Into<String>) -> Self {
        Self {
            config,
            board: board.into(),
        }
    }

    pub fn path_for(&self, raw_resource: &str, class: &str) -> PathBuf {
        self.config.metadata_path(&self.board, raw_resource, class)
    }

    /// Fresh, uncovered field set for one resource token and class.
    pub async fn load(&self, raw_resource: &str, class: &str) -> Result<MetadataFields> {
        let path = self.path_for(raw_resource, class);
        debug!(path = %path.display(), "reading metadata");
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| CheckError::io(&path, e))?;
        MetadataFields::from_csv(&bytes, &self.config.metadata_sentinel, &path)
    }
}
