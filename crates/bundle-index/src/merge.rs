//! Index merge engine
//!
//! Combines the verbatim blocks of a previous document with entries built
//! from the archives in a [`ChangeSet`]. Preserved blocks are never
//! re-serialized.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use bundle_fs::ArchivePath;

use crate::changeset::ChangeSet;
use crate::digest::{ContentDigest, Sha256Digest};
use crate::document::{ParsedIndex, render_document};
use crate::entry::IndexEntry;
use crate::extract::{Extract, Extraction, SkipReason};

/// An archive left out of the new document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedArchive {
    pub path: ArchivePath,
    pub reason: SkipReason,
}

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Nothing changed since the previous document; write nothing
    Unchanged,
    Updated {
        document: String,
        increment: u64,
        /// Blocks carried over verbatim
        preserved: usize,
        /// Entries built from changed archives
        regenerated: usize,
        skipped: Vec<SkippedArchive>,
    },
}

type Clock = Box<dyn Fn() -> DateTime<Utc>>;

/// Builds new index documents.
pub struct MergeEngine {
    root: PathBuf,
    name: String,
    digest: Box<dyn ContentDigest>,
    clock: Clock,
}

impl std::fmt::Debug for MergeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeEngine")
            .field("root", &self.root)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl MergeEngine {
    /// `root` is the directory archive paths are relative to.
    pub fn new(root: &Path, name: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            name: name.to_string(),
            digest: Box::new(Sha256Digest),
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_digest(mut self, digest: Box<dyn ContentDigest>) -> Self {
        self.digest = digest;
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Merge `changes` into `previous`.
    ///
    /// With no previous document every changed archive is new. A full
    /// change set ignores previous records but still advances past the
    /// previous increment.
    pub fn merge(
        &self,
        changes: &ChangeSet,
        previous: Option<&ParsedIndex>,
        extractor: &dyn Extract,
    ) -> MergeOutcome {
        if changes.is_empty() && previous.is_some() && !changes.is_full() {
            tracing::debug!("Empty change set, index unchanged");
            return MergeOutcome::Unchanged;
        }

        let preserved: Vec<&str> = match previous {
            Some(previous) if !changes.is_full() => previous
                .records
                .iter()
                .filter(|record| !changes.contains(&record.path))
                .map(|record| record.block.as_str())
                .collect(),
            _ => Vec::new(),
        };

        let mut fresh = Vec::new();
        let mut skipped = Vec::new();
        for path in changes.paths() {
            match self.build_entry(path, extractor) {
                Ok(Some(entry)) => fresh.push(entry.to_block()),
                Ok(None) => {}
                Err(reason) => {
                    tracing::warn!(%path, %reason, "Skipping archive");
                    skipped.push(SkippedArchive {
                        path: path.clone(),
                        reason,
                    });
                }
            }
        }

        let previous_increment = previous.and_then(|p| p.increment);
        let increment = self.next_increment(previous_increment);
        let document = render_document(
            &self.name,
            increment,
            preserved.iter().copied().chain(fresh.iter().map(String::as_str)),
        );

        tracing::debug!(
            preserved = preserved.len(),
            regenerated = fresh.len(),
            skipped = skipped.len(),
            increment,
            "Merged index"
        );
        MergeOutcome::Updated {
            document,
            increment,
            preserved: preserved.len(),
            regenerated: fresh.len(),
            skipped,
        }
    }

    /// `Ok(None)` when the archive is gone from disk.
    fn build_entry(
        &self,
        path: &ArchivePath,
        extractor: &dyn Extract,
    ) -> Result<Option<IndexEntry>, SkipReason> {
        let native = path.to_native(&self.root);
        if !native.is_file() {
            tracing::debug!(%path, "Changed archive no longer on disk");
            return Ok(None);
        }

        let unreadable = |e: std::io::Error| SkipReason::Unreadable {
            message: e.to_string(),
        };
        let stamp = |meta: std::fs::Metadata| (meta.len(), meta.modified().ok());

        // Digest and size come from this single read; the manifest must
        // describe the same bytes.
        let before = std::fs::metadata(&native).map(stamp).map_err(unreadable)?;
        let bytes = std::fs::read(&native).map_err(unreadable)?;
        let manifest = match extractor.extract(&native) {
            Extraction::Manifest(manifest) => manifest,
            Extraction::NotIndexable(reason) => return Err(reason),
        };
        let after = std::fs::metadata(&native).map(stamp).map_err(unreadable)?;
        if before != after || after.0 != bytes.len() as u64 {
            return Err(SkipReason::Unreadable {
                message: "archive changed while it was being indexed".into(),
            });
        }

        Ok(Some(IndexEntry {
            path: path.clone(),
            identity: manifest.identity,
            version: manifest.version,
            digest: self.digest.digest(&bytes),
            size: bytes.len() as u64,
            display_name: manifest.display_name,
        }))
    }

    /// Milliseconds since the epoch, strictly above the previous increment.
    fn next_increment(&self, previous: Option<u64>) -> u64 {
        let now = u64::try_from((self.clock)().timestamp_millis()).unwrap_or(0);
        match previous {
            Some(prev) => now.max(prev.saturating_add(1)),
            None => now,
        }
    }
}
