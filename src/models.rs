use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// A registry package name, split on its scope separator.
///
/// Scoped names (`@scope/name`) need a different metadata URL and cannot be
/// sent to the bulk download-count endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageName {
    Unscoped(String),
    Scoped { scope: String, name: String },
}

impl PackageName {
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('/') {
            Some((scope, name)) => PackageName::Scoped {
                scope: scope.to_string(),
                name: name.to_string(),
            },
            None => PackageName::Unscoped(raw.to_string()),
        }
    }

    pub fn is_scoped(&self) -> bool {
        matches!(self, PackageName::Scoped { .. })
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageName::Unscoped(name) => write!(f, "{}", name),
            PackageName::Scoped { scope, name } => write!(f, "{}/{}", scope, name),
        }
    }
}

/// Registry metadata for one package. Only the fields used for ranking are kept.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PackageRecord {
    pub name: String,
    /// Very old releases carry no `maintainers` field at all.
    #[serde(default)]
    pub maintainers: Option<Vec<Maintainer>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Maintainer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Last-month download counts keyed by package name.
///
/// A package missing from the map has no known count, which is distinct from a
/// count of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadCounts(HashMap<String, u64>);

impl DownloadCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn insert(&mut self, name: impl Into<String>, count: u64) {
        self.0.insert(name.into(), count);
    }

    pub fn extend(&mut self, other: DownloadCounts) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Descending order by count. Packages without a count sort after every
    /// package that has one, including a count of zero.
    pub fn cmp_desc(&self, a: &str, b: &str) -> Ordering {
        // `None < Some(_)`, so reversing the comparison sends `None` last.
        self.get(b).cmp(&self.get(a))
    }
}

impl FromIterator<(String, u64)> for DownloadCounts {
    fn from_iter<T: IntoIterator<Item = (String, u64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Author name → package names, ranked. Authors keep first-seen order.
pub type AuthorPkgMap = IndexMap<String, Vec<String>>;

/// What was read from the local project before any network access.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory holding the nearest `package.json`.
    pub root: PathBuf,
    /// Names from `dependencies`, `devDependencies` and `optionalDependencies`.
    pub direct: IndexSet<String>,
    /// Names of the top-level packages installed in `node_modules`.
    pub installed: Vec<String>,
}

/// Authors and package teams seeking donations, ranked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Donations {
    pub seeking_authors: Vec<String>,
    pub seeking_packages: Vec<String>,
    /// Author links first, then package links. Not deduplicated.
    pub donate_links: Vec<String>,
}

impl Donations {
    pub fn is_empty(&self) -> bool {
        self.seeking_authors.is_empty() && self.seeking_packages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scoped_and_unscoped() {
        assert_eq!(
            PackageName::parse("left-pad"),
            PackageName::Unscoped("left-pad".to_string())
        );
        let scoped = PackageName::parse("@babel/core");
        assert!(scoped.is_scoped());
        assert_eq!(scoped.to_string(), "@babel/core");
    }

    #[test]
    fn test_missing_count_sorts_after_zero() {
        let counts: DownloadCounts = vec![("zero".to_string(), 0), ("ten".to_string(), 10)]
            .into_iter()
            .collect();
        let mut names = vec!["missing", "zero", "ten"];
        names.sort_by(|a, b| counts.cmp_desc(a, b));
        assert_eq!(names, vec!["ten", "zero", "missing"]);
    }
}
