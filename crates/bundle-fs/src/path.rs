//! Normalized path handling
//!
//! Two path types live here. [`NormalizedPath`] is a forward-slash path used
//! at I/O boundaries. [`ArchivePath`] is the repository-relative key under
//! which an archive is recorded in the index; every producer of archive keys
//! (directory walks, version-control status, the previous index document)
//! must go through [`ArchivePath::new`] so keys compare equal.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{Error, Result};

/// A forward-slash path handed to the I/O helpers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: path.as_ref().to_string_lossy().replace('\\', "/"),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Platform-native form for I/O calls.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Append one or more `/`-separated segments.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if self.inner.ends_with('/') {
            Self::new(format!("{}{segment}", self.inner))
        } else {
            Self::new(format!("{}/{segment}", self.inner))
        }
    }

    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Extension of the last segment, without the dot. Dotfiles have none.
    pub fn extension(&self) -> Option<&str> {
        let name = self.inner.trim_end_matches('/').rsplit('/').next()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[idx + 1..]),
            _ => None,
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

/// Repository-relative archive key.
///
/// Normal form: forward slashes, no empty or `.` segments, no leading `./`
/// or `/`. `..` segments are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Normalize a raw relative path string into an archive key.
    ///
    /// ```
    /// use bundle_fs::ArchivePath;
    ///
    /// assert_eq!(ArchivePath::new("./deps//a/./b.jar").as_str(), "deps/a/b.jar");
    /// assert_eq!(ArchivePath::new("deps\\a\\b.jar").as_str(), "deps/a/b.jar");
    /// ```
    pub fn new(raw: &str) -> Self {
        let unified = raw.replace('\\', "/");
        let normalized = unified
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        Self(normalized)
    }

    /// Compute the key of `path` relative to `root`.
    ///
    /// Relative inputs are taken to be relative to `root` already.
    pub fn relative_to(root: &Path, path: &Path) -> Result<Self> {
        if path.is_relative() {
            return Ok(Self::new(&path.to_string_lossy()));
        }
        let stripped = path.strip_prefix(root).map_err(|_| Error::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;
        Ok(Self::new(&stripped.to_string_lossy()))
    }

    /// Get the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve the key against a repository root.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, s| acc.join(s))
    }

    /// The directory part of the key, if any.
    pub fn parent(&self) -> Option<&str> {
        self.0.rfind('/').map(|idx| &self.0[..idx])
    }

    /// The final segment of the key.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Case-insensitive extension check (`ext` without the dot).
    pub fn has_extension(&self, ext: &str) -> bool {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => name[idx + 1..].eq_ignore_ascii_case(ext),
            _ => false,
        }
    }

    /// Whether this key lies under the (normalized) directory `dir`.
    pub fn is_under(&self, dir: &str) -> bool {
        let dir = ArchivePath::new(dir);
        if dir.0.is_empty() {
            return true;
        }
        self.0
            .strip_prefix(dir.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
    }
}

impl std::fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ArchivePath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
