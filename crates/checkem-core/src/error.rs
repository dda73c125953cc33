//! Error types for store loading and per-file setup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading schemas, catalogs, metadata or mapping files.
///
/// At the run level these are fatal; inside a single mapping file's
/// validation they are reported as that file's only diagnostic.
#[derive(Error, Debug)]
pub enum CheckError {
    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document did not parse.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A metadata CSV did not parse.
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The YAML configuration did not parse.
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A schema document parsed but does not have the expected layout.
    #[error("invalid schema {path}: {reason}")]
    InvalidSchema { path: PathBuf, reason: String },

    /// The ADT catalog parsed but does not have the expected layout.
    #[error("invalid ADT catalog {path}: {reason}")]
    InvalidCatalog { path: PathBuf, reason: String },

    /// A mapping document is not an object of field keys.
    #[error("invalid mapping {path}: {reason}")]
    InvalidMapping { path: PathBuf, reason: String },

    /// A mapping file name does not encode board, resource and class.
    #[error("cannot derive resource and class from file name \"{0}\"")]
    FileName(String),

    /// The resource token of a mapping file names no configured resource type.
    #[error("unknown resource type \"{0}\"")]
    UnknownResource(String),

    /// A spawned load or validation task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

impl CheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for checkem operations.
pub type Result<T> = std::result::Result<T, CheckError>;
