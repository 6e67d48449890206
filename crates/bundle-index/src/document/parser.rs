//! Decomposing a previous index document into reusable resource blocks

use bundle_fs::ArchivePath;

use super::xml::{Tag, TagKind, Tokenizer};
use crate::error::{Error, Result};

const RESOURCE: &str = "resource";
const CAPABILITY: &str = "capability";
const ATTRIBUTE: &str = "attribute";

pub(crate) const IDENTITY_NS: &str = "osgi.identity";
pub(crate) const CONTENT_NS: &str = "osgi.content";
pub(crate) const INFO_NS: &str = "bnd.info";

/// One resource record of a previous document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Normalized content location
    pub path: ArchivePath,
    /// Exact source text, from the start of the `<resource>` line through
    /// `</resource>`
    pub block: String,
    pub identity: Option<String>,
    pub version: Option<String>,
}

/// A parsed index document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedIndex {
    pub name: Option<String>,
    pub increment: Option<u64>,
    /// Records in document order, unique by path
    pub records: Vec<ResourceRecord>,
    /// Resources dropped for lacking a location, repeating one, or being
    /// truncated
    pub dropped: usize,
}

impl ParsedIndex {
    /// Parse a document.
    ///
    /// A document without a `<repository>` root is an error. Damage after
    /// the root degrades instead: only the record holding a malformed tag
    /// is left out, counted in [`dropped`](Self::dropped), and parsing
    /// continues with the next record.
    pub fn parse(text: &str) -> Result<Self> {
        let mut index = ParsedIndex::default();
        let mut seen_root = false;
        let mut current: Option<PendingRecord> = None;
        // A malformed tag outside any open record, possibly its `<resource>`
        let mut orphan_damage = false;

        for token in Tokenizer::new(text) {
            let tag = match token {
                Ok(tag) => tag,
                Err(e) if seen_root => {
                    tracing::warn!(error = %e, "Index document is damaged, skipping the record");
                    match current.as_mut() {
                        Some(pending) => pending.broken = true,
                        None => orphan_damage = true,
                    }
                    continue;
                }
                Err(e) => return Err(e),
            };

            match (tag.kind, tag.name) {
                (TagKind::Open, "repository") => {
                    seen_root = true;
                    index.name = tag.attribute("name").map(str::to_string);
                    index.increment = tag
                        .attribute("increment")
                        .and_then(|v| v.trim().parse().ok());
                }
                (TagKind::Open, RESOURCE) if seen_root => {
                    if current.is_some() || orphan_damage {
                        // The previous resource never closed
                        index.dropped += 1;
                    }
                    orphan_damage = false;
                    current = Some(PendingRecord::new(line_start(text, tag.span.start)));
                }
                (TagKind::Close, RESOURCE) => match current.take() {
                    Some(pending) if pending.broken => index.dropped += 1,
                    Some(pending) => {
                        let block = &text[pending.start..tag.span.end];
                        index.finish(pending, block);
                    }
                    None if orphan_damage => {
                        orphan_damage = false;
                        index.dropped += 1;
                    }
                    None => {}
                },
                _ => {
                    if let Some(pending) = current.as_mut() {
                        pending.observe(&tag);
                    }
                }
            }
        }

        if !seen_root {
            return Err(Error::Document {
                offset: 0,
                message: "no <repository> element".into(),
            });
        }
        if current.is_some() || orphan_damage {
            index.dropped += 1;
        }

        tracing::debug!(
            records = index.records.len(),
            dropped = index.dropped,
            increment = ?index.increment,
            "Parsed previous index"
        );
        Ok(index)
    }

    /// Record for a path, if present.
    pub fn get(&self, path: &ArchivePath) -> Option<&ResourceRecord> {
        self.records.iter().find(|r| &r.path == path)
    }

    pub fn contains(&self, path: &ArchivePath) -> bool {
        self.get(path).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn finish(&mut self, pending: PendingRecord, block: &str) {
        let Some(path) = pending.url.filter(|u| !u.trim().is_empty()) else {
            tracing::warn!("Dropping resource without a content location");
            self.dropped += 1;
            return;
        };
        let path = ArchivePath::new(&path);
        if self.contains(&path) {
            tracing::warn!(%path, "Dropping repeated resource");
            self.dropped += 1;
            return;
        }
        self.records.push(ResourceRecord {
            path,
            block: block.to_string(),
            identity: pending.identity,
            version: pending.version,
        });
    }
}

/// A `<resource>` whose closing tag has not been seen yet.
struct PendingRecord {
    start: usize,
    /// Holds a malformed tag
    broken: bool,
    namespace: Option<String>,
    url: Option<String>,
    identity: Option<String>,
    version: Option<String>,
}

impl PendingRecord {
    fn new(start: usize) -> Self {
        Self {
            start,
            broken: false,
            namespace: None,
            url: None,
            identity: None,
            version: None,
        }
    }

    fn observe(&mut self, tag: &Tag<'_>) {
        match (tag.kind, tag.name) {
            (TagKind::Open, CAPABILITY) => {
                self.namespace = tag.attribute("namespace").map(str::to_string);
            }
            (TagKind::Close, CAPABILITY) => self.namespace = None,
            (TagKind::Empty | TagKind::Open, ATTRIBUTE) => {
                let (Some(name), Some(value)) = (tag.attribute("name"), tag.attribute("value"))
                else {
                    return;
                };
                let slot = match (self.namespace.as_deref(), name) {
                    (Some(CONTENT_NS), "url") => &mut self.url,
                    (Some(IDENTITY_NS), IDENTITY_NS) => &mut self.identity,
                    (Some(IDENTITY_NS), "version") => &mut self.version,
                    _ => return,
                };
                slot.get_or_insert_with(|| value.to_string());
            }
            _ => {}
        }
    }
}

/// Start of the line holding `pos` when only indentation precedes it.
fn line_start(text: &str, pos: usize) -> usize {
    let before = &text[..pos];
    let start = before.rfind('\n').map_or(0, |idx| idx + 1);
    if before[start..].chars().all(|c| c == ' ' || c == '\t') {
        start
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "<?xml version='1.0' encoding='UTF-8'?>
<repository increment='1700000000000' name='Deps' xmlns='http://www.osgi.org/xmlns/repository/v1.0.0'>
  <resource>
    <capability namespace='osgi.identity'>
      <attribute name='osgi.identity' value='org.example.a'/>
      <attribute name='version' type='Version' value='1.0.0'/>
    </capability>
    <capability namespace='osgi.content'>
      <attribute name='osgi.content' value='abc'/>
      <attribute name='url' value='./deps/a/a-1.0.0.jar'/>
    </capability>
  </resource>
  <resource>
    <capability namespace='osgi.identity'>
      <attribute name='osgi.identity' value='no.location'/>
    </capability>
  </resource>
</repository>
";

    #[test]
    fn reads_wrapper_and_records() {
        let index = ParsedIndex::parse(DOC).unwrap();
        assert_eq!(index.name.as_deref(), Some("Deps"));
        assert_eq!(index.increment, Some(1_700_000_000_000));
        assert_eq!(index.len(), 1);
        assert_eq!(index.dropped, 1);

        let record = &index.records[0];
        assert_eq!(record.path.as_str(), "deps/a/a-1.0.0.jar");
        assert_eq!(record.identity.as_deref(), Some("org.example.a"));
        assert_eq!(record.version.as_deref(), Some("1.0.0"));
    }

    #[test]
    fn block_is_exact_source_slice() {
        let index = ParsedIndex::parse(DOC).unwrap();
        let block = &index.records[0].block;
        assert!(block.starts_with("  <resource>\n"));
        assert!(block.ends_with("</resource>"));
        assert!(DOC.contains(block.as_str()));
    }

    #[test]
    fn missing_root_is_an_error() {
        assert!(ParsedIndex::parse("not xml at all").is_err());
        assert!(ParsedIndex::parse("").is_err());
    }

    #[test]
    fn truncated_document_keeps_complete_records() {
        let cut = DOC.find("<capability namespace='osgi.identity'>\n      <attribute name='osgi.identity' value='no").unwrap();
        let truncated = format!("{}<attribute name='x", &DOC[..cut]);

        let index = ParsedIndex::parse(&truncated).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.dropped, 1);
    }

    #[test]
    fn malformed_record_between_valid_ones_is_the_only_loss() {
        let doc = "<repository name='x'>
  <resource><capability namespace='osgi.content'><attribute name='url' value='a.jar'/></capability></resource>
  <resource><capability namespace='osgi.content'><attribute name=url value='b.jar'/></capability></resource>
  <resource><capability namespace='osgi.content'><attribute name='url' value='c.jar'/></capability></resource>
</repository>";
        let index = ParsedIndex::parse(doc).unwrap();

        let paths: Vec<_> = index.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a.jar", "c.jar"]);
        assert_eq!(index.dropped, 1);
        assert!(index.records[1].block.starts_with("  <resource>"));
    }

    #[test]
    fn malformed_resource_tag_drops_only_that_record() {
        let doc = "<repository name='x'>
  <resource broken><capability namespace='osgi.content'><attribute name='url' value='a.jar'/></capability></resource>
  <resource><capability namespace='osgi.content'><attribute name='url' value='b.jar'/></capability></resource>
</repository>";
        let index = ParsedIndex::parse(doc).unwrap();

        let paths: Vec<_> = index.records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["b.jar"]);
        assert_eq!(index.dropped, 1);
    }

    #[test]
    fn repeated_location_keeps_first() {
        let doc = "<repository name='x'>
  <resource><capability namespace='osgi.content'><attribute name='url' value='a.jar'/></capability><!-- first --></resource>
  <resource><capability namespace='osgi.content'><attribute name='url' value='./a.jar'/></capability></resource>
</repository>";
        let index = ParsedIndex::parse(doc).unwrap();
        assert_eq!(index.len(), 1);
        assert!(index.records[0].block.contains("first"));
        assert_eq!(index.dropped, 1);
    }

    #[test]
    fn empty_repository_has_no_records() {
        let index = ParsedIndex::parse("<repository increment='5' name='x'></repository>").unwrap();
        assert!(index.is_empty());
        assert_eq!(index.increment, Some(5));
    }
}
