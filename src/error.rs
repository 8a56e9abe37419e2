use std::path::PathBuf;
use thiserror::Error;

/// Startup problems. Nothing is touched when one of these is returned.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no source directory given (pass PATH or set PDF_RENAMER_DIR)")]
    MissingSourceDir,
    #[error("source directory does not exist or is not a directory: {0:?}")]
    InvalidSourceDir(PathBuf),
    #[error("concurrency limit must be a positive integer, got {0}")]
    InvalidConcurrency(usize),
    #[error("file extension must not be empty")]
    EmptyExtension,
}

/// The metadata collaborator could not read a file.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("failed to parse PDF {path:?}: {source}")]
    Pdf {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
    #[error("extraction task for {path:?} did not complete: {source}")]
    Task {
        path: PathBuf,
        #[source]
        source: tokio::task::JoinError,
    },
}

/// The filesystem refused the move. The source file is left where it was.
#[derive(Error, Debug)]
#[error("failed to rename {from:?} to {to:?}: {source}")]
pub struct RenameError {
    pub from: PathBuf,
    pub to: PathBuf,
    #[source]
    pub source: std::io::Error,
}
