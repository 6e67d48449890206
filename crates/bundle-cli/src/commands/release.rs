//! The `release` command

use std::path::{Path, PathBuf};

use colored::Colorize;

use bundle_index::{RunMode, RunOptions};

use super::index::print_report;
use super::open_indexer;
use crate::error::Result;

/// Rebuild the release index from every archive in the release inventory.
pub fn run_release(root: &Path, path: Option<PathBuf>, json: bool) -> Result<()> {
    let indexer = open_indexer(root)?;
    let options = RunOptions {
        inventory: path,
        force: true,
        dry_run: false,
    };

    if !json {
        println!("{} Rebuilding release index...", "=>".blue().bold());
    }
    let report = indexer.execute(RunMode::Release, &options)?;
    print_report(&report, json)
}
