//! Bundle manifest parsing
//!
//! A manifest is a header-per-line text file. Long values wrap onto
//! following lines that begin with a single space; those continuation
//! lines are joined onto the previous header before any value is
//! interpreted. Only the main section (up to the first blank line) is read.

use serde::Serialize;

/// Identity header name.
pub const SYMBOLIC_NAME: &str = "Bundle-SymbolicName";
/// Version header name.
pub const VERSION: &str = "Bundle-Version";
/// Display-name header name.
pub const NAME: &str = "Bundle-Name";

/// A single logical header with continuations already joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Headers of a manifest's main section, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestHeaders {
    headers: Vec<Header>,
}

impl ManifestHeaders {
    /// Tokenize manifest text into logical headers.
    ///
    /// Lines without a `:` are ignored. CRLF and LF endings are accepted.
    pub fn parse(text: &str) -> Self {
        let mut logical: Vec<String> = Vec::new();

        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some(last) = logical.last_mut() {
                    last.push_str(continuation);
                }
                continue;
            }
            if line.is_empty() {
                if logical.is_empty() {
                    continue;
                }
                // End of the main section
                break;
            }
            logical.push(line.to_string());
        }

        let headers = logical
            .into_iter()
            .filter_map(|line| {
                let (name, value) = line.split_once(':')?;
                let value = value.strip_prefix(' ').unwrap_or(value);
                Some(Header {
                    name: name.trim().to_string(),
                    value: value.to_string(),
                })
            })
            .collect();

        Self { headers }
    }

    /// Look up a header by name (case-insensitive, first match wins).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

/// Why an archive's manifest cannot be indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ManifestProblem {
    /// A required header is absent or empty
    MissingHeader { header: String },
}

impl std::fmt::Display for ManifestProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestProblem::MissingHeader { header } => write!(f, "missing {header} header"),
        }
    }
}

/// Identifying metadata of one bundle archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleManifest {
    /// Symbolic name with directives stripped
    pub identity: String,
    pub version: String,
    pub display_name: Option<String>,
}

impl BundleManifest {
    /// Parse manifest text.
    ///
    /// ```
    /// use bundle_index::manifest::BundleManifest;
    ///
    /// let text = "Bundle-SymbolicName: org.example.wid\r\n get;singleton:=true\r\nBundle-Version: 1.0.0\r\n";
    /// let manifest = BundleManifest::from_text(text).unwrap();
    /// assert_eq!(manifest.identity, "org.example.widget");
    /// ```
    pub fn from_text(text: &str) -> Result<Self, ManifestProblem> {
        Self::from_headers(&ManifestHeaders::parse(text))
    }

    pub fn from_headers(headers: &ManifestHeaders) -> Result<Self, ManifestProblem> {
        let identity = headers
            .get(SYMBOLIC_NAME)
            .map(|v| v.split(';').next().unwrap_or_default().trim())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ManifestProblem::MissingHeader {
                header: SYMBOLIC_NAME.to_string(),
            })?;

        let version = headers
            .get(VERSION)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ManifestProblem::MissingHeader {
                header: VERSION.to_string(),
            })?;

        let display_name = headers
            .get(NAME)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(Self {
            identity: identity.to_string(),
            version: version.to_string(),
            display_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_simple_headers() {
        let text = "Manifest-Version: 1.0\nBundle-SymbolicName: org.example.widget\nBundle-Version: 1.2.0\nBundle-Name: Widget\n";
        let manifest = BundleManifest::from_text(text).unwrap();
        assert_eq!(
            manifest,
            BundleManifest {
                identity: "org.example.widget".into(),
                version: "1.2.0".into(),
                display_name: Some("Widget".into()),
            }
        );
    }

    #[test]
    fn joins_continuation_lines_before_truncating() {
        let text = "Bundle-SymbolicName: org.eclipse.some.very.long.bun\r\n dle.name;singleton:=tr\r\n ue\r\nBundle-Version: 3.1.0.v2020\r\n";
        let manifest = BundleManifest::from_text(text).unwrap();
        assert_eq!(manifest.identity, "org.eclipse.some.very.long.bundle.name");
        assert_eq!(manifest.version, "3.1.0.v2020");
        assert_eq!(manifest.display_name, None);
    }

    #[test]
    fn directive_split_across_lines_is_still_stripped() {
        let text = "Bundle-SymbolicName: a.b\n ;singleton:=true\nBundle-Version: 1\n";
        assert_eq!(BundleManifest::from_text(text).unwrap().identity, "a.b");
    }

    #[test]
    fn missing_version_is_not_indexable() {
        let text = "Bundle-SymbolicName: org.example.widget\n";
        assert_eq!(
            BundleManifest::from_text(text),
            Err(ManifestProblem::MissingHeader {
                header: VERSION.into()
            })
        );
    }

    #[test]
    fn missing_identity_is_not_indexable() {
        let text = "Bundle-Version: 1.0\nBundle-Name: Plain jar\n";
        assert!(matches!(
            BundleManifest::from_text(text),
            Err(ManifestProblem::MissingHeader { header }) if header == SYMBOLIC_NAME
        ));
    }

    #[test]
    fn empty_identity_counts_as_missing() {
        let text = "Bundle-SymbolicName: ;singleton:=true\nBundle-Version: 1.0\n";
        assert!(BundleManifest::from_text(text).is_err());
    }

    #[test]
    fn stops_at_first_blank_line() {
        let text = "Bundle-Version: 1.0\n\nName: com/example/\nBundle-SymbolicName: per.entry\n";
        let headers = ManifestHeaders::parse(text);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get(SYMBOLIC_NAME), None);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let headers = ManifestHeaders::parse("bundle-version: 2.0\n");
        assert_eq!(headers.get(VERSION), Some("2.0"));
    }
}
