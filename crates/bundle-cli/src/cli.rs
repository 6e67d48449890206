//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bundle-index - Maintain an OSGi repository index for a bundle inventory
#[derive(Parser, Debug)]
#[command(name = "bundle-index")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug output (parse and detection counts)
    #[arg(
        short,
        long,
        global = true,
        env = "BUNDLE_INDEX_DEBUG",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub verbose: bool,

    /// Repository root holding the index document [default: current directory]
    #[arg(long, global = true, env = "BUNDLE_INDEX_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Update the index for the bundles inventory
    ///
    /// Only archives changed since the last run are re-read; every other
    /// entry is carried over unchanged.
    ///
    /// Examples:
    ///   bundle-index index                  # Index ./dependencies
    ///   bundle-index index vendor/bundles   # Index another inventory
    ///   bundle-index index --force          # Rebuild from scratch
    Index {
        /// Inventory directory, relative to the root [default: dependencies]
        path: Option<PathBuf>,

        /// Regenerate every entry, ignoring the previous index
        #[arg(short, long)]
        force: bool,

        /// Show the resulting diff without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Output the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild the release index from scratch
    Release {
        /// Inventory directory, relative to the root [default: release]
        path: Option<PathBuf>,

        /// Output the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List indexed bundles with their latest versions
    List {
        /// Read the release index instead
        #[arg(long)]
        release: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_index_with_flags() {
        let cli = Cli::try_parse_from(["bundle-index", "-v", "index", "deps", "--force"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Commands::Index {
                path: Some(PathBuf::from("deps")),
                force: true,
                dry_run: false,
                json: false,
            }
        );
    }

    #[test]
    fn parse_global_root_after_subcommand() {
        let cli = Cli::try_parse_from(["bundle-index", "list", "--root", "/srv/repo"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/srv/repo")));
        assert_eq!(
            cli.command,
            Commands::List {
                release: false,
                json: false
            }
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["bundle-index"]).is_err());
    }
}
