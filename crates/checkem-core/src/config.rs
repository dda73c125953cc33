//! Runner layout and run configuration.
//!
//! All input locations derive from a single runner root:
//!
//! ```text
//! <root>/resources/es_mappings/es_<plural>_standard.json
//! <root>/resources/es_mappings/es_<plural>_custom.json
//! <root>/resources/es_mappings/adt.json          (optional)
//! <root>/metadata/<board>_<resource>_<class>.csv
//! <root>/mappings/<board>/*
//! <root>/environment/<board>.env
//! <root>/queries/<board>/<board>_queries.json
//! ```
//!
//! An optional `checkem.yaml` at the root overrides the resource list, the
//! ADT catalog location, the metadata sentinel and the active prefix.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::catalogs::{
    CONFIG_FILE_NAME, DEFAULT_ACTIVE_PREFIX, DEFAULT_ADT_CATALOG, DEFAULT_METADATA_SENTINEL,
    DEFAULT_RESOURCES, ENVIRONMENT_DIR, MAPPINGS_DIR, METADATA_DIR, QUERIES_DIR, SCHEMA_DIR,
};
use crate::error::{CheckError, Result};

/// A resource type: the singular schema key and the plural schema file stem.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceSpec {
    pub name: String,
    pub plural: String,
}

/// Which schema document of a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaLayer {
    Standard,
    Custom,
}

impl SchemaLayer {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaLayer::Standard => "standard",
            SchemaLayer::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub root: PathBuf,
    pub resources: Vec<ResourceSpec>,
    pub adt_catalog: PathBuf,
    pub metadata_sentinel: String,
    pub active_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            resources: DEFAULT_RESOURCES
                .iter()
                .map(|(name, plural)| ResourceSpec {
                    name: (*name).to_string(),
                    plural: (*plural).to_string(),
                })
                .collect(),
            adt_catalog: PathBuf::from(DEFAULT_ADT_CATALOG),
            metadata_sentinel: DEFAULT_METADATA_SENTINEL.to_string(),
            active_prefix: DEFAULT_ACTIVE_PREFIX.to_string(),
        }
    }
}

impl Config {
    /// Default configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Read a YAML configuration file and attach it to `root`.
    pub fn load(path: &Path, root: impl Into<PathBuf>) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CheckError::io(path, e))?;
        let mut config: Config =
            serde_yaml::from_str(&content).map_err(|source| CheckError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.root = root.into();
        Ok(config)
    }

    /// Use `<root>/checkem.yaml` when present, defaults otherwise.
    pub fn discover(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Self::load(&config_path, root)
        } else {
            Ok(Self::with_root(root))
        }
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceSpec> {
        self.resources.iter().find(|r| r.name == name)
    }

    pub fn schema_path(&self, resource: &ResourceSpec, layer: SchemaLayer) -> PathBuf {
        self.root.join(SCHEMA_DIR).join(format!(
            "es_{}_{}.json",
            resource.plural,
            layer.as_str()
        ))
    }

    pub fn adt_catalog_path(&self) -> PathBuf {
        self.root.join(&self.adt_catalog)
    }

    /// Metadata CSV for a mapping file, named after its raw resource token.
    pub fn metadata_path(&self, board: &str, raw_resource: &str, class: &str) -> PathBuf {
        self.root
            .join(METADATA_DIR)
            .join(format!("{board}_{raw_resource}_{class}.csv"))
    }

    pub fn mappings_dir(&self, board: &str) -> PathBuf {
        self.root.join(MAPPINGS_DIR).join(board)
    }

    pub fn environment_file(&self, board: &str) -> PathBuf {
        self.root.join(ENVIRONMENT_DIR).join(format!("{board}.env"))
    }

    /// The board's query file and its test counterpart.
    pub fn query_files(&self, board: &str) -> [PathBuf; 2] {
        let dir = self.root.join(QUERIES_DIR).join(board);
        [
            dir.join(format!("{board}_queries.json")),
            dir.join(format!("test_{board}_queries.json")),
        ]
    }
}
