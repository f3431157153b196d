use std::io;
use std::path::PathBuf;

use cukegen_core::{DocumentError, KeywordTableError};

/// Terminal failures of a generation run. Nothing is written once one of
/// these is returned.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("feature path must not be empty")]
    InputMissing,

    #[error("failed to read feature file {path}: {source}")]
    ReadFeature {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },

    #[error("failed to inspect handler directory {path}: {source}")]
    ScanRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to list handler directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to read handler file {path}: {source}")]
    ReadHandler {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read keyword table {path}: {source}")]
    ReadKeywords {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}: {source}")]
    Keywords {
        path: PathBuf,
        #[source]
        source: KeywordTableError,
    },

    #[error("failed to read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("failed to render steps: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("{0} already exists (pass --force to overwrite)")]
    DestinationExists(PathBuf),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
