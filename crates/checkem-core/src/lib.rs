//! Mapping conformance checker.
//!
//! Validates a board's search-index field mappings against the standard and
//! custom schemas of each resource type, an optional allowed-data-type
//! catalog and the metadata field lists of each resource class.

pub mod adt;
pub mod catalogs;
pub mod config;
pub mod error;
pub mod mapping;
pub mod metadata;
pub mod orchestrator;
pub mod schema;
pub mod types;
pub mod validator;

pub use adt::AdtCatalog;
pub use config::{Config, ResourceSpec, SchemaLayer};
pub use error::{CheckError, Result};
pub use mapping::{MappingDeclaration, MappingFileName, MappingValue, Nesting, NestingEntry};
pub use metadata::{MetadataFields, MetadataIndex};
pub use orchestrator::{list_mapping_files, Orchestrator, Stores};
pub use schema::{SchemaField, SchemaStore};
pub use types::*;
pub use validator::{validate, ValidationContext};
