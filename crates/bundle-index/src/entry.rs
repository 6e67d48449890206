//! Freshly generated index entries

use bundle_fs::ArchivePath;
use serde::Serialize;

use crate::document::parser::{CONTENT_NS, IDENTITY_NS, INFO_NS};
use crate::document::xml::escape;

/// MIME type recorded for every bundle.
pub const BUNDLE_MIME: &str = "application/vnd.osgi.bundle";

/// One resource record built from an archive on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub path: ArchivePath,
    pub identity: String,
    pub version: String,
    pub digest: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl IndexEntry {
    /// Serialize as a resource block, indented for the repository element
    /// and without a trailing newline.
    pub fn to_block(&self) -> String {
        let mut lines = vec![
            "  <resource>".to_string(),
            format!("    <capability namespace='{IDENTITY_NS}'>"),
            attribute(IDENTITY_NS, None, &self.identity),
            attribute("type", None, "osgi.bundle"),
            attribute("version", Some("Version"), &self.version),
            "    </capability>".to_string(),
            format!("    <capability namespace='{CONTENT_NS}'>"),
            attribute(CONTENT_NS, None, &self.digest),
            attribute("url", None, self.path.as_str()),
            attribute("size", Some("Long"), &self.size.to_string()),
            attribute("mime", None, BUNDLE_MIME),
            "    </capability>".to_string(),
        ];
        if let Some(name) = &self.display_name {
            lines.push(format!("    <capability namespace='{INFO_NS}'>"));
            lines.push(attribute("name", None, name));
            lines.push("    </capability>".to_string());
        }
        lines.push("  </resource>".to_string());
        lines.join("\n")
    }
}

fn attribute(name: &str, kind: Option<&str>, value: &str) -> String {
    match kind {
        Some(kind) => format!(
            "      <attribute name='{name}' type='{kind}' value='{}'/>",
            escape(value)
        ),
        None => format!("      <attribute name='{name}' value='{}'/>", escape(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ParsedIndex, render_document};
    use pretty_assertions::assert_eq;

    fn entry(display_name: Option<&str>) -> IndexEntry {
        IndexEntry {
            path: ArchivePath::new("dependencies/org.example.widget/widget-1.0.0.jar"),
            identity: "org.example.widget".into(),
            version: "1.0.0".into(),
            digest: "ab12".into(),
            size: 1024,
            display_name: display_name.map(str::to_string),
        }
    }

    #[test]
    fn renders_identity_and_content_capabilities() {
        let expected = "  <resource>
    <capability namespace='osgi.identity'>
      <attribute name='osgi.identity' value='org.example.widget'/>
      <attribute name='type' value='osgi.bundle'/>
      <attribute name='version' type='Version' value='1.0.0'/>
    </capability>
    <capability namespace='osgi.content'>
      <attribute name='osgi.content' value='ab12'/>
      <attribute name='url' value='dependencies/org.example.widget/widget-1.0.0.jar'/>
      <attribute name='size' type='Long' value='1024'/>
      <attribute name='mime' value='application/vnd.osgi.bundle'/>
    </capability>
  </resource>";
        assert_eq!(entry(None).to_block(), expected);
    }

    #[test]
    fn display_name_adds_info_capability() {
        let block = entry(Some("Widget <core>")).to_block();
        assert!(block.contains("<capability namespace='bnd.info'>"));
        assert!(block.contains("value='Widget &lt;core&gt;'"));
    }

    #[test]
    fn block_parses_back_to_its_key() {
        let entry = entry(Some("Widget"));
        let doc = render_document("x", 1, [entry.to_block().as_str()]);
        let parsed = ParsedIndex::parse(&doc).unwrap();

        assert_eq!(parsed.records[0].path, entry.path);
        assert_eq!(parsed.records[0].identity.as_deref(), Some("org.example.widget"));
        assert_eq!(parsed.records[0].block, entry.to_block());
    }
}
