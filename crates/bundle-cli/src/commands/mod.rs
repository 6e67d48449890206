//! Command implementations for bundle-cli

pub mod index;
pub mod list;
pub mod release;

use std::path::Path;

use bundle_fs::NormalizedPath;
use bundle_index::{IndexConfig, IndexRun};

use crate::error::{CliError, Result};

pub use index::run_index;
pub use list::run_list;
pub use release::run_release;

/// Load the configuration for `root` and bind an indexer to it.
pub fn open_indexer(root: &Path) -> Result<IndexRun> {
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Repository root not found: {}",
            root.display()
        )));
    }
    let config = IndexConfig::load(&NormalizedPath::new(root))?;
    Ok(IndexRun::new(root, config)?)
}
