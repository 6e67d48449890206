//! Error types for bundle-index

use std::path::PathBuf;

/// Result type for bundle-index operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bundle-index operations
///
/// Only configuration-level problems surface here. Problems with a single
/// archive are reported through [`Extraction::NotIndexable`](crate::Extraction)
/// and never abort a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The inventory directory to index does not exist
    #[error("Inventory directory not found: {path}")]
    InventoryNotFound { path: PathBuf },

    /// None of the configured manifest extractors can run on this host
    #[error("No manifest extractor available (tried: {requested})")]
    NoExtractorAvailable { requested: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// A repository index document could not be parsed
    #[error("Malformed index document at byte {offset}: {message}")]
    Document { offset: usize, message: String },

    /// Compressing the index document failed
    #[error("Failed to compress index document: {0}")]
    Compression(#[source] std::io::Error),

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from bundle-fs
    #[error(transparent)]
    Fs(#[from] bundle_fs::Error),

    /// Version-control error from bundle-git
    #[error(transparent)]
    Git(#[from] bundle_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
