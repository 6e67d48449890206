//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects debug output for
/// the indexer crates and everything else stays at warnings.
pub fn init(verbose: bool) {
    let default_directives = if verbose {
        "warn,bundle_index=debug,bundle_git=debug,bundle_fs=debug,bundle_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
    if result.is_ok() {
        tracing::debug!("Debug logging enabled");
    }
}
