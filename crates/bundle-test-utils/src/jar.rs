//! Builders for bundle archives.

use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Manifest entry name inside a bundle archive.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Render manifest text from header pairs, CRLF terminated like real jars.
pub fn manifest_text(headers: &[(&str, &str)]) -> String {
    let mut out = String::from("Manifest-Version: 1.0\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");
    out
}

/// Write a zip archive containing the given entries.
///
/// # Panics
/// Panics if the archive cannot be written.
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("write_archive: create parent");
    }
    let file = std::fs::File::create(path)
        .unwrap_or_else(|e| panic!("write_archive: create {}: {e}", path.display()));
    let mut zw = ZipWriter::new(file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        zw.start_file(*name, opts).expect("write_archive: start_file");
        zw.write_all(data).expect("write_archive: write entry");
    }
    zw.finish().expect("write_archive: finish");
}

/// Write a jar carrying a manifest with the given headers and a dummy class.
pub fn write_jar(path: &Path, headers: &[(&str, &str)]) {
    let manifest = manifest_text(headers);
    write_archive(
        path,
        &[
            (MANIFEST_ENTRY, manifest.as_bytes()),
            ("com/example/Widget.class", b"\xca\xfe\xba\xbe".as_slice()),
        ],
    );
}

/// Write a jar for `symbolic_name` at `version`.
pub fn write_bundle(path: &Path, symbolic_name: &str, version: &str) {
    write_jar(
        path,
        &[
            ("Bundle-SymbolicName", symbolic_name),
            ("Bundle-Version", version),
        ],
    );
}
