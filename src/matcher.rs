use crate::donations::DonationTable;
use crate::models::{AuthorPkgMap, Donations, DownloadCounts};

/// Find the authors and package teams in the donation table.
///
/// Authors are ranked by how many of the project's packages they maintain,
/// packages by download count. Both sorts are stable. Links are listed authors
/// first, then packages, and are not deduplicated.
pub fn match_donations(
    author_pkg_names: &AuthorPkgMap,
    download_counts: &DownloadCounts,
    all_pkg_names: &[String],
    table: &DonationTable,
) -> Donations {
    let mut seeking_authors: Vec<String> = author_pkg_names
        .keys()
        .filter(|author| table.author_url(author).is_some())
        .cloned()
        .collect();
    seeking_authors.sort_by(|a, b| author_pkg_names[b].len().cmp(&author_pkg_names[a].len()));

    let mut seeking_packages: Vec<String> = all_pkg_names
        .iter()
        .filter(|name| table.package_url(name).is_some())
        .cloned()
        .collect();
    seeking_packages.sort_by(|a, b| download_counts.cmp_desc(a, b));

    let donate_links = seeking_authors
        .iter()
        .filter_map(|author| table.author_url(author))
        .chain(
            seeking_packages
                .iter()
                .filter_map(|name| table.package_url(name)),
        )
        .map(str::to_string)
        .collect();

    Donations {
        seeking_authors,
        seeking_packages,
        donate_links,
    }
}
