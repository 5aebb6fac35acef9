//! Error types for dataset loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while loading the product dataset.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Dataset file does not exist.
    #[error("dataset not found: {0}")]
    NotFound(PathBuf),

    /// Dataset file exists but cannot be parsed.
    #[error("dataset parse error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
