//! The `list` command

use std::path::Path;

use colored::Colorize;

use bundle_fs::{NormalizedPath, io};
use bundle_index::{ParsedIndex, RunMode, summarize};

use super::open_indexer;
use crate::error::{CliError, Result};

/// List the bundles recorded in the index with their latest versions.
pub fn run_list(root: &Path, release: bool, json: bool) -> Result<()> {
    let indexer = open_indexer(root)?;
    let mode = if release {
        RunMode::Release
    } else {
        RunMode::Incremental
    };
    let index_path = indexer.index_path(mode);

    let Some(text) = io::read_text_optional(&NormalizedPath::new(&index_path))? else {
        return Err(CliError::user(format!(
            "No index at {}. Run 'bundle-index index' first.",
            index_path.display()
        )));
    };
    let parsed = ParsedIndex::parse(&text)?;
    let summaries = summarize(&parsed);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).map_err(bundle_index::Error::from)?
        );
        return Ok(());
    }

    if summaries.is_empty() {
        println!("{} The index has no bundles.", "=>".blue().bold());
        return Ok(());
    }

    let width = summaries
        .iter()
        .map(|s| s.identity.len())
        .max()
        .unwrap_or(0);
    for summary in &summaries {
        let count = summary.versions.len();
        println!(
            "  {}  {}  {}",
            format!("{:<width$}", summary.identity).cyan(),
            summary.latest.green(),
            format!("({count} version{})", if count == 1 { "" } else { "s" }).dimmed(),
        );
    }
    println!();
    println!(
        "{} bundle(s), {} record(s)",
        summaries.len(),
        parsed.len()
    );
    Ok(())
}
