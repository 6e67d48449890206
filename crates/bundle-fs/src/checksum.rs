//! SHA-256 content digests
//!
//! Digests are lowercase hex without a prefix, the form the repository
//! index records in its content capability.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a byte slice.
pub fn compute_digest(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let a = compute_digest(b"test");
        let b = compute_digest(b"test");
        assert_eq!(a, b);
    }

    #[test]
    fn different_content_different_digest() {
        assert_ne!(compute_digest(b"aaa"), compute_digest(b"bbb"));
    }

    #[test]
    fn digest_known_value() {
        assert_eq!(
            compute_digest(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }
}
