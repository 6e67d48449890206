//! Incremental repository index generation for bundle archives
//!
//! This crate implements the indexing pipeline:
//!
//! - **Manifest extraction**: identity, version and display name read from
//!   each archive through a chain of entry readers
//! - **Change detection**: version-control status, modification times, or
//!   every archive on first and forced runs
//! - **Previous index parsing**: resource blocks kept verbatim, keyed by
//!   their content location
//! - **Merging**: preserved blocks plus fresh entries, unique by path
//! - **Version metadata**: one `maven-metadata.xml` per touched artifact
//!   directory
//!
//! # Architecture
//!
//! ```text
//!                 bundle-cli
//!                     |
//!                bundle-index
//!                     |
//!          +----------+---------+
//!          |                    |
//!      bundle-fs           bundle-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use bundle_index::{IndexConfig, IndexRun, RunMode, RunOptions};
//! use std::path::Path;
//!
//! fn example() -> bundle_index::Result<()> {
//!     let root = Path::new(".");
//!     let run = IndexRun::new(root, IndexConfig::load(&root.into())?)?;
//!     let report = run.execute(RunMode::Incremental, &RunOptions::default())?;
//!     println!("{} archives changed", report.changed);
//!     Ok(())
//! }
//! ```

pub mod changeset;
pub mod compress;
pub mod config;
pub mod digest;
pub mod document;
pub mod entry;
pub mod error;
pub mod extract;
pub mod inventory;
pub mod listing;
pub mod manifest;
pub mod merge;
pub mod metadata;
pub mod run;
pub mod version;

pub use changeset::{ChangeDetector, ChangeSet, Strategy};
pub use compress::{Compressor, GzipCompressor};
pub use config::{ExtractorKind, IndexConfig};
pub use digest::{ContentDigest, Sha256Digest};
pub use document::{ParsedIndex, ResourceRecord, render_document};
pub use entry::IndexEntry;
pub use error::{Error, Result};
pub use extract::{
    EntryReader, Extract, Extraction, JarReader, ManifestExtractor, SkipReason, UnzipReader,
    ZipEntryReader,
};
pub use listing::{BundleSummary, summarize};
pub use manifest::BundleManifest;
pub use merge::{MergeEngine, MergeOutcome, SkippedArchive};
pub use metadata::{ArtifactVersionIndex, MetadataGenerator};
pub use run::{IndexRun, Outcome, RunMode, RunOptions, RunReport};
pub use version::{BundleVersion, compare_versions, sort_versions};
