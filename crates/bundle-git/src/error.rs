//! Error types for bundle-git

use std::path::PathBuf;

/// Result type for bundle-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in bundle-git operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Filesystem error: {0}")]
    Fs(#[from] bundle_fs::Error),

    #[error("Repository at {path} has no working tree")]
    BareRepository { path: PathBuf },
}
