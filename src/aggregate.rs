use indexmap::IndexSet;

use crate::models::{AuthorPkgMap, DownloadCounts, PackageRecord};

/// Group package names by maintainer and rank each maintainer's list.
///
/// Every maintainer of a package gets that package in their list. Each list
/// starts with the direct dependencies, in the order they were encountered,
/// followed by the remaining packages by download count, highest first.
/// Packages without a count go last; ties keep encounter order.
pub fn compute_authors_pkg_names(
    records: &[PackageRecord],
    download_counts: &DownloadCounts,
    direct_names: &IndexSet<String>,
) -> AuthorPkgMap {
    let mut authors = AuthorPkgMap::new();

    for record in records {
        let Some(maintainers) = &record.maintainers else {
            continue;
        };
        for maintainer in maintainers {
            let names = authors.entry(maintainer.name.clone()).or_default();
            // A maintainer listed twice on one package still gets it once
            if !names.contains(&record.name) {
                names.push(record.name.clone());
            }
        }
    }

    for names in authors.values_mut() {
        let (direct, mut transitive): (Vec<String>, Vec<String>) = names
            .drain(..)
            .partition(|name| direct_names.contains(name));

        // `sort_by` is stable
        transitive.sort_by(|a, b| download_counts.cmp_desc(a, b));

        names.extend(direct);
        names.extend(transitive);
    }

    authors
}
