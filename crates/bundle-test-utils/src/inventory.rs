//! [`TestInventory`] builder for indexer scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

use crate::jar;

/// A temporary repository root with a bundle inventory underneath.
///
/// # Example
///
/// ```rust,no_run
/// use bundle_test_utils::inventory::TestInventory;
///
/// let inv = TestInventory::new();
/// inv.add_bundle("dependencies/org.example.widget/widget-1.0.0.jar", "org.example.widget", "1.0.0");
/// inv.assert_file_exists("dependencies/org.example.widget/widget-1.0.0.jar");
/// ```
pub struct TestInventory {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Default for TestInventory {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInventory {
    /// Create an empty repository root.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        // Canonical root so keys computed from walks and from git agree
        let root = temp_dir.path().canonicalize().unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Return the root path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a root-relative path.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a valid bundle jar.
    pub fn add_bundle(&self, relative: &str, symbolic_name: &str, version: &str) -> PathBuf {
        let path = self.path(relative);
        jar::write_bundle(&path, symbolic_name, version);
        path
    }

    /// Write a jar with arbitrary manifest headers.
    pub fn add_jar(&self, relative: &str, headers: &[(&str, &str)]) -> PathBuf {
        let path = self.path(relative);
        jar::write_jar(&path, headers);
        path
    }

    /// Write an arbitrary file.
    pub fn write_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create a directory.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Set a file's modification time relative to now.
    pub fn set_age(&self, relative: &str, age: Duration) {
        let when = SystemTime::now() - age;
        filetime::set_file_mtime(self.path(relative), filetime::FileTime::from_system_time(when))
            .unwrap();
    }

    /// Set a file's modification time to exactly that of another file.
    pub fn copy_mtime(&self, from: &str, to: &str) {
        let meta = fs::metadata(self.path(from)).unwrap();
        let mtime = filetime::FileTime::from_last_modification_time(&meta);
        filetime::set_file_mtime(self.path(to), mtime).unwrap();
    }

    /// Read a root-relative file to a string.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative))
            .unwrap_or_else(|_| panic!("Could not read file: {relative}"))
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `relative` does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, relative: &str) {
        let full_path = self.path(relative);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }
}
