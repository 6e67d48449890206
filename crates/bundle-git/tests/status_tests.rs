//! Tests for working tree status collection

use bundle_git::{FileChange, StatusProvider, WorkingTree};
use bundle_test_utils::git::{commit_all, real_git_repo, stage};
use bundle_test_utils::inventory::TestInventory;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn changed(tree: &WorkingTree) -> Vec<(PathBuf, FileChange)> {
    let mut files = tree.changed_files().unwrap();
    files.sort_by(|a, b| a.0.cmp(&b.0));
    files
}

#[test]
fn test_discover_outside_repository_is_none() {
    let inv = TestInventory::new();
    // A fresh temp dir is not under version control
    let tree = WorkingTree::discover(inv.root()).unwrap();
    if let Some(tree) = tree {
        // Some CI sandboxes place temp dirs inside a checkout
        assert!(!tree.workdir().starts_with(inv.root()));
    }
}

#[test]
fn test_untracked_file_reported() {
    let inv = TestInventory::new();
    real_git_repo(inv.root());
    inv.add_bundle("dependencies/a/a-1.0.jar", "a", "1.0");

    let tree = WorkingTree::discover(inv.root()).unwrap().unwrap();
    assert_eq!(
        changed(&tree),
        vec![(inv.path("dependencies/a/a-1.0.jar"), FileChange::Untracked)]
    );
}

#[test]
fn test_committed_file_not_reported_until_modified() {
    let inv = TestInventory::new();
    let repo = real_git_repo(inv.root());
    inv.add_bundle("dependencies/a/a-1.0.jar", "a", "1.0");
    commit_all(&repo, "add a");

    let tree = WorkingTree::discover(inv.root()).unwrap().unwrap();
    assert!(changed(&tree).is_empty());

    inv.add_bundle("dependencies/a/a-1.0.jar", "a", "1.0.1");
    assert_eq!(
        changed(&tree),
        vec![(inv.path("dependencies/a/a-1.0.jar"), FileChange::Modified)]
    );
}

#[test]
fn test_staged_file_reported_as_added() {
    let inv = TestInventory::new();
    let repo = real_git_repo(inv.root());
    inv.write_file("README.md", b"# bundles");
    commit_all(&repo, "init");

    inv.add_bundle("dependencies/b/b-2.0.jar", "b", "2.0");
    stage(&repo, "dependencies/b/b-2.0.jar");

    let tree = WorkingTree::discover(inv.root()).unwrap().unwrap();
    assert_eq!(
        changed(&tree),
        vec![(inv.path("dependencies/b/b-2.0.jar"), FileChange::Added)]
    );
}

#[test]
fn test_deleted_file_not_reported() {
    let inv = TestInventory::new();
    let repo = real_git_repo(inv.root());
    inv.add_bundle("dependencies/a/a-1.0.jar", "a", "1.0");
    commit_all(&repo, "add a");

    std::fs::remove_file(inv.path("dependencies/a/a-1.0.jar")).unwrap();

    let tree = WorkingTree::discover(inv.root()).unwrap().unwrap();
    assert!(changed(&tree).is_empty());
}

#[test]
fn test_discover_from_subdirectory() {
    let inv = TestInventory::new();
    real_git_repo(inv.root());
    inv.mkdir("dependencies");

    let tree = WorkingTree::discover(&inv.path("dependencies")).unwrap().unwrap();
    assert_eq!(tree.workdir(), inv.root());
}
