//! bundle-index CLI
//!
//! Maintains the repository index and version metadata for a directory of
//! bundle archives.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    execute_command(root, cli.command)
}

fn execute_command(root: PathBuf, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Index {
            path,
            force,
            dry_run,
            json,
        } => commands::run_index(&root, path, force, dry_run, json),
        Commands::Release { path, json } => commands::run_release(&root, path, json),
        Commands::List { release, json } => commands::run_list(&root, release, json),
    }
}
