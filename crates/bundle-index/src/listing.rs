//! Summaries of the bundles recorded in an index document

use std::collections::BTreeMap;

use serde::Serialize;

use crate::document::ParsedIndex;
use crate::version::sort_versions;

/// All recorded versions of one bundle identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSummary {
    pub identity: String,
    pub latest: String,
    /// Ascending under version ordering
    pub versions: Vec<String>,
    pub paths: Vec<String>,
}

/// Group the records of `index` by identity, sorted by identity.
///
/// Records without an identity or version are left out.
pub fn summarize(index: &ParsedIndex) -> Vec<BundleSummary> {
    let mut grouped: BTreeMap<&str, (Vec<String>, Vec<String>)> = BTreeMap::new();
    for record in &index.records {
        let (Some(identity), Some(version)) = (&record.identity, &record.version) else {
            continue;
        };
        let (versions, paths) = grouped.entry(identity.as_str()).or_default();
        versions.push(version.clone());
        paths.push(record.path.to_string());
    }

    grouped
        .into_iter()
        .filter_map(|(identity, (versions, mut paths))| {
            let versions = sort_versions(versions);
            let latest = versions.last()?.clone();
            paths.sort();
            Some(BundleSummary {
                identity: identity.to_string(),
                latest,
                versions,
                paths,
            })
        })
        .collect()
}
