//! Working-tree status via git2

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, Status, StatusOptions};

use crate::{Error, Result};

/// Kind of change reported for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    /// Not tracked by version control
    Untracked,
    /// Staged as a new file
    Added,
    /// Modified in the index or the working tree
    Modified,
}

/// Source of changed-file information for a working tree.
///
/// Returned paths are absolute.
pub trait StatusProvider {
    /// Root of the working tree
    fn workdir(&self) -> &Path;

    /// Untracked, added and modified files. Deletions and renames are not
    /// reported.
    fn changed_files(&self) -> Result<Vec<(PathBuf, FileChange)>>;
}

/// A git working tree.
pub struct WorkingTree {
    repo: Repository,
    workdir: PathBuf,
}

impl std::fmt::Debug for WorkingTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingTree")
            .field("workdir", &self.workdir)
            .finish()
    }
}

impl WorkingTree {
    /// Discover the repository containing `path`.
    ///
    /// Returns `Ok(None)` when `path` is not under version control.
    pub fn discover(path: &Path) -> Result<Option<Self>> {
        let repo = match Repository::discover(path) {
            Ok(repo) => repo,
            Err(e) if e.code() == ErrorCode::NotFound => {
                tracing::debug!(path = %path.display(), "No git repository found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let workdir = repo
            .workdir()
            .ok_or_else(|| Error::BareRepository {
                path: repo.path().to_path_buf(),
            })?
            .to_path_buf();
        let workdir = dunce::canonicalize(&workdir)
            .map_err(|e| bundle_fs::Error::io(&workdir, e))?;

        tracing::debug!(workdir = %workdir.display(), "Discovered git working tree");
        Ok(Some(Self { repo, workdir }))
    }
}

impl StatusProvider for WorkingTree {
    fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn changed_files(&self) -> Result<Vec<(PathBuf, FileChange)>> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        let mut changed = Vec::new();

        for entry in statuses.iter() {
            let Some(change) = classify(entry.status()) else {
                continue;
            };
            let Some(relative) = entry.path() else {
                tracing::warn!("Skipping status entry with non-UTF-8 path");
                continue;
            };
            changed.push((self.workdir.join(relative), change));
        }

        tracing::debug!(count = changed.len(), "Collected working tree changes");
        Ok(changed)
    }
}

fn classify(status: Status) -> Option<FileChange> {
    if status.contains(Status::WT_NEW) {
        Some(FileChange::Untracked)
    } else if status.contains(Status::INDEX_NEW) {
        Some(FileChange::Added)
    } else if status.intersects(Status::WT_MODIFIED | Status::INDEX_MODIFIED) {
        Some(FileChange::Modified)
    } else {
        None
    }
}
