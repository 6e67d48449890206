//! Change set detection
//!
//! A [`ChangeSet`] is computed once per run and drives both the index
//! merge and the choice of artifact directories whose version metadata is
//! regenerated.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use bundle_fs::{ArchivePath, NormalizedPath, io};
use bundle_git::{StatusProvider, WorkingTree};
use serde::Serialize;

use crate::error::Result;
use crate::inventory;

/// How a change set was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Full regeneration was requested
    Forced,
    /// No previous index exists
    FirstRun,
    /// A previous index exists but could not be read
    Recovery,
    /// Version-control status of the working tree
    VersionControl,
    /// Modification times newer than the previous index
    Timestamp,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::Forced => "forced",
            Strategy::FirstRun => "first run",
            Strategy::Recovery => "recovery",
            Strategy::VersionControl => "version control",
            Strategy::Timestamp => "timestamp",
        };
        f.write_str(s)
    }
}

/// Archive paths considered modified for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<ArchivePath>,
    full: bool,
    strategy: Strategy,
}

impl ChangeSet {
    /// A change set covering every archive in the inventory.
    pub fn full(paths: impl IntoIterator<Item = ArchivePath>, strategy: Strategy) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            full: true,
            strategy,
        }
    }

    /// An incremental change set.
    pub fn partial(paths: impl IntoIterator<Item = ArchivePath>, strategy: Strategy) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            full: false,
            strategy,
        }
    }

    /// Whether previous entries must be ignored.
    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn paths(&self) -> impl Iterator<Item = &ArchivePath> {
        self.paths.iter()
    }

    pub fn contains(&self, path: &ArchivePath) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Directories holding changed archives, strictly below `inventory`.
    pub fn touched_dirs(&self, inventory: &ArchivePath) -> BTreeSet<ArchivePath> {
        self.paths
            .iter()
            .filter_map(|p| p.parent())
            .map(ArchivePath::new)
            .filter(|dir| dir != inventory && dir.is_under(inventory.as_str()))
            .collect()
    }
}

/// Decides which archives changed since the last index build.
pub struct ChangeDetector {
    root: PathBuf,
    inventory: PathBuf,
    extension: String,
    index: PathBuf,
    status: Option<Box<dyn StatusProvider>>,
    index_unreadable: bool,
}

impl std::fmt::Debug for ChangeDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeDetector")
            .field("root", &self.root)
            .field("inventory", &self.inventory)
            .field("extension", &self.extension)
            .field("index", &self.index)
            .field("version_control", &self.status.is_some())
            .field("index_unreadable", &self.index_unreadable)
            .finish()
    }
}

impl ChangeDetector {
    /// Paths are expected to be canonical, with `inventory` under `root`.
    pub fn new(root: &Path, inventory: &Path, extension: &str, index: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            inventory: inventory.to_path_buf(),
            extension: extension.to_string(),
            index: index.to_path_buf(),
            status: None,
            index_unreadable: false,
        }
    }

    /// Mark the previous index as present but unusable.
    ///
    /// Its entries cannot be preserved, so every archive is regenerated.
    pub fn with_unreadable_index(mut self, unreadable: bool) -> Self {
        self.index_unreadable = unreadable;
        self
    }

    /// Use an explicit status source.
    pub fn with_status(mut self, status: Box<dyn StatusProvider>) -> Self {
        self.status = Some(status);
        self
    }

    /// Use the git working tree containing the inventory, if there is one.
    ///
    /// Discovery failures degrade to timestamp comparison.
    pub fn discover_status(mut self) -> Self {
        match WorkingTree::discover(&self.inventory) {
            Ok(Some(tree)) => self.status = Some(Box::new(tree)),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Version control unavailable, comparing timestamps");
            }
        }
        self
    }

    /// Compute the change set.
    pub fn detect(&self, force: bool) -> Result<ChangeSet> {
        if force {
            let all = self.all_archives()?;
            tracing::debug!(count = all.len(), "Forced full regeneration");
            return Ok(ChangeSet::full(all, Strategy::Forced));
        }

        let index_mtime = io::modified_time(&NormalizedPath::new(&self.index))?;
        let Some(index_mtime) = index_mtime else {
            let all = self.all_archives()?;
            tracing::info!(count = all.len(), "No previous index, treating this as the first run");
            return Ok(ChangeSet::full(all, Strategy::FirstRun));
        };

        if self.index_unreadable {
            let all = self.all_archives()?;
            tracing::warn!(
                count = all.len(),
                "Previous index unreadable, regenerating every archive"
            );
            return Ok(ChangeSet::full(all, Strategy::Recovery));
        }

        if let Some(status) = &self.status {
            match self.from_status(status.as_ref()) {
                Ok(paths) => {
                    tracing::debug!(count = paths.len(), "Changed archives from version control");
                    return Ok(ChangeSet::partial(paths, Strategy::VersionControl));
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "Version-control status failed, comparing timestamps"
                    );
                }
            }
        }

        let paths = self.newer_than(index_mtime)?;
        tracing::debug!(count = paths.len(), "Changed archives from timestamps");
        Ok(ChangeSet::partial(paths, Strategy::Timestamp))
    }

    fn key(&self, path: &Path) -> Result<ArchivePath> {
        Ok(ArchivePath::relative_to(&self.root, path)?)
    }

    fn all_archives(&self) -> Result<Vec<ArchivePath>> {
        inventory::find_archives(&self.inventory, &self.extension)
            .iter()
            .map(|p| self.key(p))
            .collect()
    }

    fn from_status(&self, status: &dyn StatusProvider) -> Result<Vec<ArchivePath>> {
        let changed = status.changed_files()?;
        changed
            .into_iter()
            .filter(|(path, _)| path.starts_with(&self.inventory))
            .filter(|(path, _)| {
                path.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(&self.extension))
            })
            .map(|(path, change)| {
                tracing::debug!(path = %path.display(), ?change, "Changed in working tree");
                self.key(&path)
            })
            .collect()
    }

    /// Archives modified at or after `since`. Equal times count as changed.
    fn newer_than(&self, since: SystemTime) -> Result<Vec<ArchivePath>> {
        let mut paths = Vec::new();
        for archive in inventory::find_archives(&self.inventory, &self.extension) {
            let modified = io::modified_time(&NormalizedPath::new(&archive))?;
            if modified.is_some_and(|m| m >= since) {
                paths.push(self.key(&archive)?);
            }
        }
        Ok(paths)
    }
}
