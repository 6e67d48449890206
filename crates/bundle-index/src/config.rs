//! Indexer configuration
//!
//! Loaded from an optional `bundle-index.toml` (or `.json`) at the
//! repository root. Every field has a default, so a repository without a
//! config file behaves like the conventional layout.

use std::fmt;
use std::str::FromStr;

use bundle_fs::{ConfigStore, NormalizedPath, WellKnown};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Strategy used to read the manifest entry out of an archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorKind {
    /// In-process zip reader
    Builtin,
    /// External `unzip -p`
    Unzip,
    /// External `jar xf` into a scratch directory
    Jar,
}

impl FromStr for ExtractorKind {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "builtin" | "zip" => Ok(ExtractorKind::Builtin),
            "unzip" => Ok(ExtractorKind::Unzip),
            "jar" => Ok(ExtractorKind::Jar),
            _ => Err(Error::Config {
                message: format!("unknown extractor '{s}' (expected builtin, unzip or jar)"),
            }),
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorKind::Builtin => write!(f, "builtin"),
            ExtractorKind::Unzip => write!(f, "unzip"),
            ExtractorKind::Jar => write!(f, "jar"),
        }
    }
}

/// Repository-level indexer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Display name written on the index document
    pub name: String,
    /// Index document file name, relative to the repository root
    pub index: String,
    /// Incrementally indexed inventory directory
    pub bundles_dir: String,
    /// Release inventory directory, always fully regenerated
    pub release_dir: String,
    /// Index document for the release inventory
    pub release_index: String,
    /// Archive file extension, without the dot
    pub archive_extension: String,
    /// Manifest extractors, tried in order
    pub extractors: Vec<ExtractorKind>,
    /// Version-metadata document name inside each artifact directory
    pub metadata_file: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            name: "GOSS Dependencies".to_string(),
            index: WellKnown::IndexFile.to_string(),
            bundles_dir: WellKnown::BundlesDir.to_string(),
            release_dir: WellKnown::ReleaseDir.to_string(),
            release_index: WellKnown::ReleaseIndexFile.to_string(),
            archive_extension: "jar".to_string(),
            extractors: vec![ExtractorKind::Builtin, ExtractorKind::Unzip],
            metadata_file: WellKnown::MetadataFile.to_string(),
        }
    }
}

impl IndexConfig {
    /// Load the configuration for a repository root.
    ///
    /// Looks for `bundle-index.toml`, then `bundle-index.json`. Falls back
    /// to defaults when neither exists.
    pub fn load(root: &NormalizedPath) -> Result<Self> {
        let store = ConfigStore::new();
        let toml_path = root.join(WellKnown::ConfigFile.as_str());
        let json_path = root.join("bundle-index.json");

        let loaded = match store.load_optional::<IndexConfig>(&toml_path)? {
            Some(config) => Some(config),
            None => store.load_optional::<IndexConfig>(&json_path)?,
        };

        let config = loaded.unwrap_or_default();
        config.validate()?;
        tracing::debug!(?config, "Resolved indexer configuration");
        Ok(config)
    }

    /// Reject values that would make every run fail.
    pub fn validate(&self) -> Result<()> {
        if self.extractors.is_empty() {
            return Err(Error::Config {
                message: "extractors must list at least one strategy".into(),
            });
        }
        if self.archive_extension.trim_start_matches('.').is_empty() {
            return Err(Error::Config {
                message: "archive_extension must not be empty".into(),
            });
        }
        if self.index.trim().is_empty() || self.release_index.trim().is_empty() {
            return Err(Error::Config {
                message: "index file names must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Archive extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.archive_extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_conventional_layout() {
        let config = IndexConfig::default();
        assert_eq!(config.index, "index.xml");
        assert_eq!(config.bundles_dir, "dependencies");
        assert_eq!(config.extension(), "jar");
        assert_eq!(
            config.extractors,
            vec![ExtractorKind::Builtin, ExtractorKind::Unzip]
        );
    }

    #[test]
    fn extractor_kind_parses_aliases() {
        assert_eq!("ZIP".parse::<ExtractorKind>().unwrap(), ExtractorKind::Builtin);
        assert_eq!("jar".parse::<ExtractorKind>().unwrap(), ExtractorKind::Jar);
        assert!("7z".parse::<ExtractorKind>().is_err());
    }

    #[test]
    fn empty_extractor_list_is_invalid() {
        let config = IndexConfig {
            extractors: Vec::new(),
            ..IndexConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: IndexConfig = toml::from_str("name = \"Custom\"\n").unwrap();
        assert_eq!(config.name, "Custom");
        assert_eq!(config.bundles_dir, "dependencies");
    }
}
