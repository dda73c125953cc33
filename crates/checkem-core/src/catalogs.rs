/// Built-in resource types: singular schema key and plural file stem.
pub const DEFAULT_RESOURCES: &[(&str, &str)] = &[
    ("agent", "agents"),
    ("office", "offices"),
    ("openhouse", "openhouses"),
    ("property", "properties"),
];

/// Metadata column that is never expected to appear in a mapping.
pub const DEFAULT_METADATA_SENTINEL: &str = "SystemName";

/// Prefix stripped from the resource token of a mapping file name.
pub const DEFAULT_ACTIVE_PREFIX: &str = "active";

/// Delimiter between board, resource, class and suffix in mapping file names.
pub const FILE_NAME_DELIMITER: char = '_';

/// Schema `type` value marking a field as a nest.
pub const NESTED_TYPE: &str = "nested";

/// Control key carrying the nest's display name.
pub const CONTROL_NAME: &str = "Name";

/// Control key carrying the nest's comma-separated leaf types.
pub const CONTROL_TYPE: &str = "Type";

/// Configuration file looked up at the runner root when no path is given.
pub const CONFIG_FILE_NAME: &str = "checkem.yaml";

/// Directory (relative to the root) holding the schema documents.
pub const SCHEMA_DIR: &str = "resources/es_mappings";

/// Default ADT catalog location, relative to the root.
pub const DEFAULT_ADT_CATALOG: &str = "resources/es_mappings/adt.json";

pub const MAPPINGS_DIR: &str = "mappings";
pub const METADATA_DIR: &str = "metadata";
pub const ENVIRONMENT_DIR: &str = "environment";
pub const QUERIES_DIR: &str = "queries";
