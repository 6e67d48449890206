//! The `index` command and run report output

use std::path::{Path, PathBuf};

use colored::Colorize;

use bundle_index::{Outcome, RunMode, RunOptions, RunReport};

use super::open_indexer;
use crate::error::Result;

/// Run the incremental indexer over the bundles inventory.
pub fn run_index(
    root: &Path,
    path: Option<PathBuf>,
    force: bool,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let indexer = open_indexer(root)?;
    let options = RunOptions {
        inventory: path,
        force,
        dry_run,
    };

    if !json {
        println!(
            "{} Indexing bundles{}...",
            "=>".blue().bold(),
            if force { " (forced)" } else { "" }
        );
    }
    let report = indexer.execute(RunMode::Incremental, &options)?;
    print_report(&report, json)
}

/// Print a run report, human-readable or as JSON.
pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "   {} {} ({} changed, {})",
        "inventory".dimmed(),
        report.inventory.cyan(),
        report.changed,
        report.strategy
    );
    for skipped in &report.skipped {
        println!(
            "   {} {}: {}",
            "skipped".yellow(),
            skipped.path.to_string().cyan(),
            skipped.reason
        );
    }
    if report.dropped > 0 {
        println!(
            "   {} {} malformed record(s) in the previous index were dropped",
            "!".yellow(),
            report.dropped
        );
    }
    for path in &report.metadata {
        println!("   {} {}", "metadata".dimmed(), path);
    }

    match report.outcome {
        Outcome::Unchanged => {
            println!(
                "{} {} is up to date. No changes detected.",
                "OK".green().bold(),
                report.index.cyan()
            );
        }
        Outcome::Written => {
            println!(
                "{} Wrote {} ({} preserved, {} regenerated)",
                "OK".green().bold(),
                report.index.cyan(),
                report.preserved,
                report.regenerated
            );
        }
        Outcome::DryRun => {
            if let Some(diff) = &report.diff {
                for line in diff.lines() {
                    if line.starts_with("+++") || line.starts_with("---") {
                        println!("{}", line.bold());
                    } else if line.starts_with('+') {
                        println!("{}", line.green());
                    } else if line.starts_with('-') {
                        println!("{}", line.red());
                    } else if line.starts_with("@@") {
                        println!("{}", line.cyan());
                    } else {
                        println!("{line}");
                    }
                }
            }
            println!(
                "{} Dry run: {} preserved, {} regenerated. No files written.",
                "DRY RUN".yellow().bold(),
                report.preserved,
                report.regenerated
            );
        }
    }
    Ok(())
}
