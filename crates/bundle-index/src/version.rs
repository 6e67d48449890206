//! Version ordering for bundle and artifact versions.
//!
//! Artifact versions in the wild are not semver (`2.3`, `1.0.0.Final`,
//! `4.3.0-RELEASE`), so ordering is segment-wise:
//!
//! - A trailing `-RELEASE`, `-FINAL` or `-GA` qualifier is ignored.
//! - The rest is split on `.`, `_` and `-`.
//! - Two numeric segments compare numerically; anything else compares as text.
//! - When all shared segments are equal the longer version wins.
//!
//! ```
//! use bundle_index::version::BundleVersion;
//!
//! let a = BundleVersion::new("1.9.0");
//! let b = BundleVersion::new("1.10.0");
//! assert!(a < b);
//! ```

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static QUALIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[-_](RELEASE|FINAL|GA)$").expect("Invalid qualifier regex")
});

static SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[._-]").expect("Invalid separator regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Number(u64),
    Text(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if !raw.is_empty()
            && raw.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = raw.parse()
        {
            return Segment::Number(n);
        }
        Segment::Text(raw.to_string())
    }

    fn text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Segment::Number(n) => n.to_string().into(),
            Segment::Text(s) => s.as_str().into(),
        }
    }
}

/// A version string with a total, segment-aware ordering.
#[derive(Debug, Clone)]
pub struct BundleVersion {
    raw: String,
    segments: Vec<Segment>,
}

impl BundleVersion {
    pub fn new(raw: &str) -> Self {
        let stripped = QUALIFIER_REGEX.replace(raw, "");
        let segments = SEPARATOR_REGEX
            .split(&stripped)
            .map(Segment::parse)
            .collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl Ord for BundleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.segments.iter().zip(&other.segments) {
            let ord = match (a, b) {
                (Segment::Number(x), Segment::Number(y)) => x.cmp(y),
                _ => a.text().cmp(&b.text()),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        self.segments
            .len()
            .cmp(&other.segments.len())
            // Keeps the ordering total: `1.0` and `1.0-GA` are distinct
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for BundleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for BundleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BundleVersion {}

impl std::fmt::Display for BundleVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Compare two version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    BundleVersion::new(a).cmp(&BundleVersion::new(b))
}

/// Sort version strings ascending and drop duplicates.
pub fn sort_versions(versions: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut parsed: Vec<BundleVersion> = versions
        .into_iter()
        .map(|v| BundleVersion::new(&v))
        .collect();
    parsed.sort();
    parsed.dedup();
    parsed.into_iter().map(|v| v.raw).collect()
}

/// The greatest version, if any.
pub fn latest<'a>(versions: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}
