//! Board-level driver: load stores once, fan out one task per mapping file,
//! join in enumeration order.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::adt::AdtCatalog;
use crate::config::Config;
use crate::error::{CheckError, Result};
use crate::mapping::{MappingDeclaration, MappingFileName};
use crate::metadata::MetadataIndex;
use crate::schema::SchemaStore;
use crate::types::{Diagnostic, FileReport, RunReport};
use crate::validator::{validate, ValidationContext};

/// Stores built once per run and shared read-only by every file task.
#[derive(Debug, Clone)]
pub struct Stores {
    pub schemas: SchemaStore,
    pub adt: Option<AdtCatalog>,
}

impl Stores {
    /// Load the schema store and the optional ADT catalog concurrently.
    pub async fn load(config: &Config) -> Result<Self> {
        let adt_path = config.adt_catalog_path();
        let (schemas, adt) = tokio::try_join!(
            SchemaStore::load(config),
            AdtCatalog::load_optional(&adt_path)
        )?;
        Ok(Self { schemas, adt })
    }

    pub fn context(&self) -> ValidationContext<'_> {
        ValidationContext {
            schemas: &self.schemas,
            adt: self.adt.as_ref(),
        }
    }
}

struct Shared {
    config: Config,
    stores: Stores,
    metadata: MetadataIndex,
    mappings_dir: PathBuf,
}

pub struct Orchestrator {
    config: Config,
    board: String,
}

impl Orchestrator {
    pub fn new(config: Config, board: impl Into<String>) -> Self {
        Self {
            config,
            board: board.into(),
        }
    }

    /// Validate every mapping file of the board.
    ///
    /// Setup failures (schemas, ADT catalog, mapping directory) are returned
    /// as errors; anything that goes wrong with a single file ends up in
    /// that file's report.
    pub async fn run(&self) -> Result<RunReport> {
        let stores = Stores::load(&self.config).await?;
        let mappings_dir = self.config.mappings_dir(&self.board);
        let files = list_mapping_files(&mappings_dir).await?;
        info!(board = %self.board, files = files.len(), "validating mappings");
        Ok(self.run_with(stores, files).await)
    }

    /// Validate the given files of the board's mapping directory with
    /// already-loaded stores. Reports follow the order of `files`.
    pub async fn run_with(&self, stores: Stores, files: Vec<String>) -> RunReport {
        let shared = Arc::new(Shared {
            config: self.config.clone(),
            stores,
            metadata: MetadataIndex::new(self.config.clone(), self.board.clone()),
            mappings_dir: self.config.mappings_dir(&self.board),
        });

        let reports = join_in_order(files, move |file| {
            let shared = Arc::clone(&shared);
            async move { check_file(&shared, file).await }
        })
        .await;

        RunReport {
            board: self.board.clone(),
            files: reports,
        }
    }
}

/// Spawn one task per file and collect the reports in `files` order.
///
/// A task that panics is reported as a single file-level diagnostic.
async fn join_in_order<F, Fut>(files: Vec<String>, check: F) -> Vec<FileReport>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = FileReport> + Send + 'static,
{
    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let task = tokio::spawn(check(file.clone()));
            (file, task)
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for (file, handle) in handles {
        let report = handle.await.unwrap_or_else(|e| {
            FileReport::new(
                file,
                vec![Diagnostic::file_level(
                    CheckError::Task(e.to_string()).to_string(),
                )],
            )
        });
        reports.push(report);
    }
    reports
}

/// Non-directory entries of the mapping directory, sorted by name.
pub async fn list_mapping_files(dir: &Path) -> Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| CheckError::io(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| CheckError::io(dir, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| CheckError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

async fn check_file(shared: &Shared, file: String) -> FileReport {
    let diagnostics = match check_file_inner(shared, &file).await {
        Ok(diagnostics) => diagnostics,
        Err(e) => vec![Diagnostic::file_level(e.to_string())],
    };
    debug!(file = %file, errors = diagnostics.len(), "mapping checked");
    FileReport::new(file, diagnostics)
}

async fn check_file_inner(shared: &Shared, file: &str) -> Result<Vec<Diagnostic>> {
    let path = shared.mappings_dir.join(file);
    let content = tokio::fs::read(&path)
        .await
        .map_err(|e| CheckError::io(&path, e))?;
    let mapping = MappingDeclaration::parse(&content, &path)?;

    let name = MappingFileName::parse(file, &shared.config.active_prefix)?;
    if shared.config.resource(&name.resource).is_none() {
        return Err(CheckError::UnknownResource(name.resource));
    }
    let metadata = shared.metadata.load(&name.raw_resource, &name.class).await?;

    Ok(validate(
        &mapping,
        &name.resource,
        shared.stores.context(),
        metadata,
    ))
}
