//! Walking a bundle inventory on disk

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// All archives with `extension` under `dir`, recursively, in path order.
///
/// Entries that cannot be read are logged and skipped.
pub fn find_archives(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable inventory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extension))
        .collect();
    archives.sort();
    archives
}

/// Archives directly inside `dir` (non-recursive), in path order.
pub fn archives_in(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut archives: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_extension(path, extension))
        .collect();
    archives.sort();
    archives
}

/// Every directory below `dir` (excluding `dir` itself), in path order.
pub fn artifact_dirs(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();
    dirs.sort();
    dirs
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
