//! Per-artifact version metadata
//!
//! Each artifact directory (`<group>.<artifact>`) gets a
//! `maven-metadata.xml` listing every version present as an archive in it.
//! Documents are regenerated wholesale, never merged.

use std::path::{Path, PathBuf};

use bundle_fs::{NormalizedPath, io};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::document::xml::escape;
use crate::error::Result;
use crate::inventory;
use crate::version::sort_versions;

/// Version metadata of one artifact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactVersionIndex {
    pub group_id: String,
    pub artifact_id: String,
    /// Ascending under version ordering, without repeats
    pub versions: Vec<String>,
    pub latest: String,
    pub last_updated: DateTime<Utc>,
}

impl ArtifactVersionIndex {
    /// Group id with `/` separators, as laid out in a repository.
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Render as a `maven-metadata.xml` document.
    pub fn render(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata>\n");
        out.push_str(&format!("  <groupId>{}</groupId>\n", escape(&self.group_id)));
        out.push_str(&format!(
            "  <artifactId>{}</artifactId>\n",
            escape(&self.artifact_id)
        ));
        out.push_str("  <versioning>\n");
        out.push_str(&format!("    <latest>{}</latest>\n", escape(&self.latest)));
        out.push_str(&format!("    <release>{}</release>\n", escape(&self.latest)));
        out.push_str("    <versions>\n");
        for version in &self.versions {
            out.push_str(&format!("      <version>{}</version>\n", escape(version)));
        }
        out.push_str("    </versions>\n");
        out.push_str(&format!(
            "    <lastUpdated>{}</lastUpdated>\n",
            self.last_updated.format("%Y%m%d%H%M%S")
        ));
        out.push_str("  </versioning>\n</metadata>\n");
        out
    }
}

/// Split a directory name into group and artifact ids.
///
/// `a.b.c` gives `("a.b", "c")`. A name without a dot is both.
pub fn coordinates(dir_name: &str) -> (String, String) {
    match dir_name.rsplit_once('.') {
        Some((group, artifact)) if !group.is_empty() && !artifact.is_empty() => {
            (group.to_string(), artifact.to_string())
        }
        _ => (dir_name.to_string(), dir_name.to_string()),
    }
}

/// Version part of an archive file name.
///
/// Strips `<artifact>-` and `.<extension>`. Names that do not follow the
/// pattern come back with only what could be stripped removed.
pub fn version_from_file_name(file_name: &str, artifact_id: &str, extension: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case(extension) => stem,
        _ => file_name,
    };
    let prefix = format!("{artifact_id}-");
    stem.strip_prefix(&prefix).unwrap_or(stem).to_string()
}

/// Generates and writes version metadata documents.
#[derive(Debug, Clone)]
pub struct MetadataGenerator {
    extension: String,
    file_name: String,
}

impl MetadataGenerator {
    pub fn new(extension: &str, file_name: &str) -> Self {
        Self {
            extension: extension.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Build the index for `dir`, or `None` when it holds no archives.
    pub fn generate(&self, dir: &Path, now: DateTime<Utc>) -> Option<ArtifactVersionIndex> {
        let dir_name = dir.file_name()?.to_string_lossy();
        let archives = inventory::archives_in(dir, &self.extension);
        if archives.is_empty() {
            tracing::debug!(dir = %dir.display(), "No archives, skipping version metadata");
            return None;
        }

        let (group_id, artifact_id) = coordinates(&dir_name);
        let versions = sort_versions(archives.iter().filter_map(|archive| {
            let name = archive.file_name()?.to_string_lossy();
            Some(version_from_file_name(&name, &artifact_id, &self.extension))
        }));
        let latest = versions.last()?.clone();

        Some(ArtifactVersionIndex {
            group_id,
            artifact_id,
            versions,
            latest,
            last_updated: now,
        })
    }

    /// Path of the metadata document for `dir`.
    pub fn document_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Write `index` into `dir`, replacing any previous document.
    pub fn write(&self, dir: &Path, index: &ArtifactVersionIndex) -> Result<PathBuf> {
        let path = self.document_path(dir);
        io::write_text(&NormalizedPath::new(&path), &index.render())?;
        tracing::info!(
            path = %path.display(),
            group = %index.group_path(),
            latest = %index.latest,
            "Wrote version metadata"
        );
        Ok(path)
    }
}
