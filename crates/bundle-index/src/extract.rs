//! Manifest extraction
//!
//! Reading the manifest entry out of an archive goes through the
//! [`EntryReader`] seam. Several readers are chained: the first one that
//! yields manifest bytes wins. An archive that no reader can open, or whose
//! manifest lacks the required headers, is [`Extraction::NotIndexable`];
//! that is a per-archive outcome, never a run failure.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::{Command, Stdio};

use bundle_fs::WellKnown;
use serde::Serialize;
use tempfile::TempDir;

use crate::config::ExtractorKind;
use crate::error::{Error, Result};
use crate::manifest::{BundleManifest, ManifestProblem};

/// Reads a single named entry from an archive without unpacking the rest.
pub trait EntryReader {
    fn name(&self) -> &str;

    /// Whether the reader can run on this host.
    fn is_available(&self) -> bool {
        true
    }

    /// `Ok(None)` when the archive has no such entry.
    fn read_entry(&self, archive: &Path, entry: &str) -> io::Result<Option<Vec<u8>>>;
}

/// In-process reader built on the `zip` crate.
#[derive(Debug, Default)]
pub struct ZipEntryReader;

impl EntryReader for ZipEntryReader {
    fn name(&self) -> &str {
        "builtin"
    }

    fn read_entry(&self, archive: &Path, entry: &str) -> io::Result<Option<Vec<u8>>> {
        let file = File::open(archive)?;
        let mut zip = zip::ZipArchive::new(file)?;
        let mut found = match zip.by_name(entry) {
            Ok(found) => found,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut bytes = Vec::with_capacity(found.size() as usize);
        found.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }
}

/// `unzip -p ARCHIVE ENTRY`, writing the entry to stdout.
#[derive(Debug, Default)]
pub struct UnzipReader;

impl EntryReader for UnzipReader {
    fn name(&self) -> &str {
        "unzip"
    }

    fn is_available(&self) -> bool {
        probe("unzip", &["-v"])
    }

    fn read_entry(&self, archive: &Path, entry: &str) -> io::Result<Option<Vec<u8>>> {
        let output = Command::new("unzip")
            .arg("-p")
            .arg(archive)
            .arg(entry)
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() || output.stdout.is_empty() {
            tracing::debug!(
                archive = %archive.display(),
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "unzip produced no entry"
            );
            return Ok(None);
        }
        Ok(Some(output.stdout))
    }
}

/// `jar xf ARCHIVE ENTRY` run inside a scratch directory.
///
/// The scratch directory is a [`TempDir`], removed when it goes out of
/// scope on every return path.
#[derive(Debug, Default)]
pub struct JarReader;

impl EntryReader for JarReader {
    fn name(&self) -> &str {
        "jar"
    }

    fn is_available(&self) -> bool {
        probe("jar", &["--help"])
    }

    fn read_entry(&self, archive: &Path, entry: &str) -> io::Result<Option<Vec<u8>>> {
        let scratch = TempDir::with_prefix("bundle-index-")?;
        let archive = std::path::absolute(archive)?;

        let output = Command::new("jar")
            .arg("xf")
            .arg(&archive)
            .arg(entry)
            .current_dir(scratch.path())
            .stdin(Stdio::null())
            .output()?;

        if !output.status.success() {
            tracing::debug!(
                archive = %archive.display(),
                status = ?output.status.code(),
                "jar extraction failed"
            );
            return Ok(None);
        }

        let extracted = entry
            .split('/')
            .fold(scratch.path().to_path_buf(), |acc, s| acc.join(s));
        match std::fs::read(&extracted) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A tool counts as available when it can be spawned at all.
fn probe(program: &str, args: &[&str]) -> bool {
    let available = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();
    tracing::debug!(program, available, "Probed external extractor");
    available
}

/// Why an archive was left out of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SkipReason {
    /// No reader produced a manifest
    NoManifest,
    /// Manifest present but incomplete
    Manifest { problem: ManifestProblem },
    /// Archive bytes could not be read for digesting
    Unreadable { message: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoManifest => write!(f, "no readable manifest"),
            SkipReason::Manifest { problem } => write!(f, "{problem}"),
            SkipReason::Unreadable { message } => write!(f, "unreadable: {message}"),
        }
    }
}

/// Result of extracting one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Manifest(BundleManifest),
    NotIndexable(SkipReason),
}

/// Anything that turns an archive path into an [`Extraction`].
///
/// Implemented for plain closures so tests can inject fakes.
pub trait Extract {
    fn extract(&self, archive: &Path) -> Extraction;
}

impl<F> Extract for F
where
    F: Fn(&Path) -> Extraction,
{
    fn extract(&self, archive: &Path) -> Extraction {
        self(archive)
    }
}

/// Chain of entry readers reading the bundle manifest.
pub struct ManifestExtractor {
    readers: Vec<Box<dyn EntryReader>>,
    entry: String,
}

impl std::fmt::Debug for ManifestExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestExtractor")
            .field(
                "readers",
                &self.readers.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("entry", &self.entry)
            .finish()
    }
}

impl ManifestExtractor {
    /// Build the chain for the configured strategies, keeping only those
    /// available on this host.
    ///
    /// # Errors
    ///
    /// [`Error::NoExtractorAvailable`] when none of them can run.
    pub fn from_kinds(kinds: &[ExtractorKind]) -> Result<Self> {
        let readers = kinds
            .iter()
            .map(|kind| -> Box<dyn EntryReader> {
                match kind {
                    ExtractorKind::Builtin => Box::new(ZipEntryReader),
                    ExtractorKind::Unzip => Box::new(UnzipReader),
                    ExtractorKind::Jar => Box::new(JarReader),
                }
            })
            .collect();
        Self::with_readers(readers).map_err(|_| Error::NoExtractorAvailable {
            requested: kinds
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        })
    }

    /// Build the chain from explicit readers, dropping unavailable ones.
    pub fn with_readers(readers: Vec<Box<dyn EntryReader>>) -> Result<Self> {
        let requested = readers
            .iter()
            .map(|r| r.name().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let readers: Vec<_> = readers.into_iter().filter(|r| r.is_available()).collect();
        if readers.is_empty() {
            return Err(Error::NoExtractorAvailable { requested });
        }
        Ok(Self {
            readers,
            entry: WellKnown::ManifestEntry.to_string(),
        })
    }

    /// Names of the readers in the chain, in order.
    pub fn reader_names(&self) -> Vec<&str> {
        self.readers.iter().map(|r| r.name()).collect()
    }

    fn read_manifest(&self, archive: &Path) -> Option<String> {
        for reader in &self.readers {
            match reader.read_entry(archive, &self.entry) {
                Ok(Some(bytes)) => return Some(String::from_utf8_lossy(&bytes).into_owned()),
                Ok(None) => {
                    tracing::debug!(
                        archive = %archive.display(),
                        reader = reader.name(),
                        "No manifest entry"
                    );
                }
                Err(e) => {
                    tracing::debug!(
                        archive = %archive.display(),
                        reader = reader.name(),
                        error = %e,
                        "Reader failed, trying next"
                    );
                }
            }
        }
        None
    }
}

impl Extract for ManifestExtractor {
    fn extract(&self, archive: &Path) -> Extraction {
        let Some(text) = self.read_manifest(archive) else {
            return Extraction::NotIndexable(SkipReason::NoManifest);
        };
        match BundleManifest::from_text(&text) {
            Ok(manifest) => Extraction::Manifest(manifest),
            Err(problem) => Extraction::NotIndexable(SkipReason::Manifest { problem }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundle_test_utils::inventory::TestInventory;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Unavailable;

    impl EntryReader for Unavailable {
        fn name(&self) -> &str {
            "missing-tool"
        }
        fn is_available(&self) -> bool {
            false
        }
        fn read_entry(&self, _: &Path, _: &str) -> io::Result<Option<Vec<u8>>> {
            unreachable!("unavailable readers are never called")
        }
    }

    struct Counting(Rc<Cell<usize>>, Option<&'static str>);

    impl EntryReader for Counting {
        fn name(&self) -> &str {
            "counting"
        }
        fn read_entry(&self, _: &Path, _: &str) -> io::Result<Option<Vec<u8>>> {
            self.0.set(self.0.get() + 1);
            match self.1 {
                Some(text) => Ok(Some(text.as_bytes().to_vec())),
                None => Err(io::Error::other("corrupt")),
            }
        }
    }

    #[test]
    fn builtin_reads_manifest_from_jar() {
        let inv = TestInventory::new();
        let jar = inv.add_bundle("deps/a/a-1.0.jar", "org.example.a", "1.0");

        let extractor = ManifestExtractor::from_kinds(&[ExtractorKind::Builtin]).unwrap();
        assert_eq!(
            extractor.extract(&jar),
            Extraction::Manifest(BundleManifest {
                identity: "org.example.a".into(),
                version: "1.0".into(),
                display_name: None,
            })
        );
    }

    #[test]
    fn archive_without_manifest_is_not_indexable() {
        let inv = TestInventory::new();
        let path = inv.path("deps/plain.jar");
        bundle_test_utils::jar::write_archive(&path, &[("readme.txt", b"hi".as_slice())]);

        let extractor = ManifestExtractor::from_kinds(&[ExtractorKind::Builtin]).unwrap();
        assert_eq!(
            extractor.extract(&path),
            Extraction::NotIndexable(SkipReason::NoManifest)
        );
    }

    #[test]
    fn corrupt_archive_is_not_indexable() {
        let inv = TestInventory::new();
        let path = inv.write_file("deps/broken.jar", b"not a zip at all");

        let extractor = ManifestExtractor::from_kinds(&[ExtractorKind::Builtin]).unwrap();
        assert_eq!(
            extractor.extract(&path),
            Extraction::NotIndexable(SkipReason::NoManifest)
        );
    }

    #[test]
    fn falls_back_to_next_reader() {
        let primary_calls = Rc::new(Cell::new(0));
        let fallback_calls = Rc::new(Cell::new(0));
        let readers: Vec<Box<dyn EntryReader>> = vec![
            Box::new(Counting(primary_calls.clone(), None)),
            Box::new(Counting(
                fallback_calls.clone(),
                Some("Bundle-SymbolicName: x\nBundle-Version: 2\n"),
            )),
        ];
        let extractor = ManifestExtractor::with_readers(readers).unwrap();

        let result = extractor.extract(Path::new("ignored.jar"));
        assert!(matches!(result, Extraction::Manifest(m) if m.identity == "x"));
        assert_eq!(primary_calls.get(), 1);
        assert_eq!(fallback_calls.get(), 1);
    }

    #[test]
    fn no_available_reader_is_fatal() {
        let readers: Vec<Box<dyn EntryReader>> = vec![Box::new(Unavailable)];
        let result = ManifestExtractor::with_readers(readers);
        assert!(matches!(
            result,
            Err(Error::NoExtractorAvailable { requested }) if requested == "missing-tool"
        ));
    }

    #[test]
    fn incomplete_manifest_reports_missing_header() {
        let readers: Vec<Box<dyn EntryReader>> = vec![Box::new(Counting(
            Rc::new(Cell::new(0)),
            Some("Bundle-SymbolicName: x\n"),
        ))];
        let extractor = ManifestExtractor::with_readers(readers).unwrap();

        assert!(matches!(
            extractor.extract(Path::new("x.jar")),
            Extraction::NotIndexable(SkipReason::Manifest { .. })
        ));
    }
}
