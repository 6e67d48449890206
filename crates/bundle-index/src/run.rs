//! Run orchestration
//!
//! One [`IndexRun`] per invocation: resolve the inventory, parse the
//! previous document, detect changes, regenerate version metadata for
//! touched directories, merge, and write the index with its compressed and
//! digest companions. Nothing is written until the merged document exists
//! in memory.

use std::path::{Path, PathBuf};

use bundle_fs::{ArchivePath, NormalizedPath, io};
use chrono::{DateTime, Utc};
use serde::Serialize;
use similar::TextDiff;

use crate::changeset::{ChangeDetector, Strategy};
use crate::compress::{Compressor, GzipCompressor};
use crate::config::IndexConfig;
use crate::digest::{ContentDigest, Sha256Digest};
use crate::document::ParsedIndex;
use crate::error::{Error, Result};
use crate::extract::{Extract, ManifestExtractor};
use crate::inventory;
use crate::merge::{MergeEngine, MergeOutcome, SkippedArchive};
use crate::metadata::MetadataGenerator;

/// Which inventory a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// The bundles inventory, updated incrementally
    Incremental,
    /// The release inventory, always fully regenerated
    Release,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Inventory directory overriding the configured one, relative to the
    /// repository root unless absolute
    pub inventory: Option<PathBuf>,
    pub force: bool,
    /// Compute everything, write nothing, report a diff
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Unchanged,
    Written,
    DryRun,
}

/// What a run did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub inventory: String,
    pub index: String,
    pub strategy: Strategy,
    pub outcome: Outcome,
    pub changed: usize,
    pub preserved: usize,
    pub regenerated: usize,
    pub skipped: Vec<SkippedArchive>,
    /// Previous records that could not be carried over
    pub dropped: usize,
    /// Version-metadata documents written (or due, on a dry run)
    pub metadata: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl RunReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Indexer bound to one repository root.
pub struct IndexRun {
    root: PathBuf,
    config: IndexConfig,
    compressor: Box<dyn Compressor>,
    clock: fn() -> DateTime<Utc>,
}

impl std::fmt::Debug for IndexRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRun")
            .field("root", &self.root)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl IndexRun {
    /// Bind to `root`, which must exist.
    pub fn new(root: &Path, config: IndexConfig) -> Result<Self> {
        let root = io::canonical_dir(&NormalizedPath::new(root))?.to_native();
        Ok(Self {
            root,
            config,
            compressor: Box::new(GzipCompressor),
            clock: Utc::now,
        })
    }

    pub fn with_compressor(mut self, compressor: Box<dyn Compressor>) -> Self {
        self.compressor = compressor;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index document path for `mode`.
    pub fn index_path(&self, mode: RunMode) -> PathBuf {
        let name = match mode {
            RunMode::Incremental => &self.config.index,
            RunMode::Release => &self.config.release_index,
        };
        self.root.join(name)
    }

    /// Run with the configured extractor chain.
    pub fn execute(&self, mode: RunMode, options: &RunOptions) -> Result<RunReport> {
        self.inventory_dir(mode, options)?;
        let extractor = ManifestExtractor::from_kinds(&self.config.extractors)?;
        tracing::debug!(readers = ?extractor.reader_names(), "Manifest extractor chain");
        self.execute_with(mode, options, &extractor)
    }

    /// Run with an explicit extractor.
    pub fn execute_with(
        &self,
        mode: RunMode,
        options: &RunOptions,
        extractor: &dyn Extract,
    ) -> Result<RunReport> {
        let inventory = self.inventory_dir(mode, options)?;
        let inventory_key = ArchivePath::relative_to(&self.root, &inventory)?;
        let index_path = self.index_path(mode);
        let index_key = ArchivePath::relative_to(&self.root, &index_path)?;

        let previous_text = io::read_text_optional(&NormalizedPath::new(&index_path))?;
        let previous = previous_text.as_deref().and_then(|text| match ParsedIndex::parse(text) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!(
                    path = %index_path.display(),
                    error = %e,
                    "Previous index unreadable, rebuilding it from the inventory"
                );
                None
            }
        });

        let force = options.force || mode == RunMode::Release;
        let changes = ChangeDetector::new(
            &self.root,
            &inventory,
            self.config.extension(),
            &index_path,
        )
        .discover_status()
        .with_unreadable_index(previous_text.is_some() && previous.is_none())
        .detect(force)?;
        tracing::debug!(
            strategy = %changes.strategy(),
            changed = changes.len(),
            full = changes.is_full(),
            "Detected changes"
        );

        let now = (self.clock)();
        let generator = MetadataGenerator::new(self.config.extension(), &self.config.metadata_file);
        let dirs: Vec<PathBuf> = if changes.is_full() {
            inventory::artifact_dirs(&inventory)
        } else {
            changes
                .touched_dirs(&inventory_key)
                .iter()
                .map(|dir| dir.to_native(&self.root))
                .collect()
        };

        let mut metadata = Vec::new();
        for dir in &dirs {
            let Some(index) = generator.generate(dir, now) else {
                continue;
            };
            let path = if options.dry_run {
                generator.document_path(dir)
            } else {
                generator.write(dir, &index)?
            };
            metadata.push(ArchivePath::relative_to(&self.root, &path)?.to_string());
        }

        let engine = MergeEngine::new(&self.root, &self.config.name).with_clock(self.clock);
        let mut report = RunReport {
            mode,
            inventory: inventory_key.to_string(),
            index: index_key.to_string(),
            strategy: changes.strategy(),
            outcome: Outcome::Unchanged,
            changed: changes.len(),
            preserved: 0,
            regenerated: 0,
            skipped: Vec::new(),
            dropped: previous.as_ref().map_or(0, |p| p.dropped),
            metadata,
            increment: None,
            diff: None,
        };

        let MergeOutcome::Updated {
            document,
            increment,
            preserved,
            regenerated,
            skipped,
        } = engine.merge(&changes, previous.as_ref(), extractor)
        else {
            tracing::info!(index = %index_key, "No changes, index left as is");
            return Ok(report);
        };

        report.preserved = preserved;
        report.regenerated = regenerated;
        report.skipped = skipped;
        report.increment = Some(increment);

        if options.dry_run {
            let old = previous_text.unwrap_or_default();
            let diff = TextDiff::from_lines(old.as_str(), document.as_str())
                .unified_diff()
                .context_radius(3)
                .header(index_key.as_str(), index_key.as_str())
                .to_string();
            report.diff = Some(diff);
            report.outcome = Outcome::DryRun;
            return Ok(report);
        }

        self.write_outputs(&index_path, &document)?;
        report.outcome = Outcome::Written;
        Ok(report)
    }

    fn inventory_dir(&self, mode: RunMode, options: &RunOptions) -> Result<PathBuf> {
        let configured = match mode {
            RunMode::Incremental => &self.config.bundles_dir,
            RunMode::Release => &self.config.release_dir,
        };
        let requested = options
            .inventory
            .clone()
            .unwrap_or_else(|| PathBuf::from(configured));
        let path = if requested.is_absolute() {
            requested
        } else {
            self.root.join(requested)
        };

        if !path.is_dir() {
            return Err(Error::InventoryNotFound { path });
        }
        Ok(io::canonical_dir(&NormalizedPath::new(&path))?.to_native())
    }

    /// Write the document, then its gzip copy and digest file.
    fn write_outputs(&self, index_path: &Path, document: &str) -> Result<()> {
        let bytes = document.as_bytes();
        io::write_atomic(&NormalizedPath::new(index_path), bytes)?;

        let compressed = self.compressor.compress(bytes).map_err(Error::Compression)?;
        let compressed_path = sibling(index_path, self.compressor.suffix());
        io::write_atomic(&NormalizedPath::new(&compressed_path), &compressed)?;

        let sha_path = sibling(index_path, ".sha");
        io::write_text(&NormalizedPath::new(&sha_path), &Sha256Digest.digest(bytes))?;

        tracing::info!(
            index = %index_path.display(),
            compressed = %compressed_path.display(),
            "Wrote repository index"
        );
        Ok(())
    }
}

/// `index.xml` + `.gz` gives `index.xml.gz`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_appends_suffix() {
        assert_eq!(
            sibling(Path::new("/repo/index.xml"), ".gz"),
            PathBuf::from("/repo/index.xml.gz")
        );
    }
}
