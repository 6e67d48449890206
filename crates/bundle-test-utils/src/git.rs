//! Git repository fixtures.
//!
//! Everything goes through `git2` so tests do not depend on a `git` binary
//! or on the user's global git configuration.

use std::path::Path;

use git2::{IndexAddOption, Repository, Signature};

/// Initialises a real git repository (no commits).
///
/// # Panics
/// Panics if `git2::Repository::init` fails.
pub fn real_git_repo(path: &Path) -> Repository {
    Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "real_git_repo: failed to init repository at {}: {e}",
            path.display()
        )
    })
}

/// Stages every file in the working tree and commits it.
///
/// Works for both the first commit and later ones.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, message: &str) {
    let mut index = repo.index().expect("commit_all: open index");
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .expect("commit_all: add_all");
    index.write().expect("commit_all: write index");

    let tree_id = index.write_tree().expect("commit_all: write tree");
    let tree = repo.find_tree(tree_id).expect("commit_all: find tree");
    let sig = Signature::now("Test User", "test@test.com").expect("commit_all: signature");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("commit_all: commit");
}

/// Stages a single file without committing it.
///
/// # Panics
/// Panics if any git operation fails.
pub fn stage(repo: &Repository, relative: &str) {
    let mut index = repo.index().expect("stage: open index");
    index.add_path(Path::new(relative)).expect("stage: add_path");
    index.write().expect("stage: write index");
}
