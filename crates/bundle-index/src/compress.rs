//! Compression of the finished index document

use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;

/// Produces the compressed copy of the index document.
pub trait Compressor {
    /// File suffix appended to the index name, including the dot
    fn suffix(&self) -> &str;

    fn compress(&self, bytes: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// gzip at the default level.
///
/// The gzip header carries no timestamp, so identical documents compress
/// to identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn suffix(&self) -> &str {
        ".gz"
    }

    fn compress(&self, bytes: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(
            Vec::with_capacity(bytes.len() / 4),
            Compression::default(),
        );
        encoder.write_all(bytes)?;
        encoder.finish()
    }
}
