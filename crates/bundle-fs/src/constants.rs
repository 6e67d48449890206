//! Well-known file and directory names used by the indexer.

use std::path::Path;

/// Conventional names inside a bundle repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    /// The repository index document
    IndexFile,
    /// Optional indexer configuration at the repository root
    ConfigFile,
    /// Per-artifact version-metadata document
    MetadataFile,
    /// Manifest entry inside every bundle archive
    ManifestEntry,
    /// Default incremental bundle inventory
    BundlesDir,
    /// Default release inventory (always fully regenerated)
    ReleaseDir,
    /// Index document for the release inventory
    ReleaseIndexFile,
}

impl WellKnown {
    /// Get the string representation of the name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexFile => "index.xml",
            Self::ConfigFile => "bundle-index.toml",
            Self::MetadataFile => "maven-metadata.xml",
            Self::ManifestEntry => "META-INF/MANIFEST.MF",
            Self::BundlesDir => "dependencies",
            Self::ReleaseDir => "release",
            Self::ReleaseIndexFile => "release-index.xml",
        }
    }
}

impl AsRef<Path> for WellKnown {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WellKnown {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WellKnown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
