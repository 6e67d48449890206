//! Content digest seam

use bundle_fs::checksum;

/// Computes the content digest recorded for each archive.
pub trait ContentDigest {
    fn digest(&self, bytes: &[u8]) -> String;
}

/// SHA-256, lowercase hex.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl ContentDigest for Sha256Digest {
    fn digest(&self, bytes: &[u8]) -> String {
        checksum::compute_digest(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            Sha256Digest.digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
