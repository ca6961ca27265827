use indexmap::IndexSet;

use crate::aggregate::compute_authors_pkg_names;
use crate::donations::DonationTable;
use crate::matcher::match_donations;
use crate::models::{AuthorPkgMap, Donations, Project};
use crate::progress::{Phase, Progress};
use crate::registry::Registry;

/// Everything the reports need after a run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub donations: Donations,
    pub author_pkg_names: AuthorPkgMap,
    pub direct: IndexSet<String>,
}

/// Fetch maintainers and download counts for every installed package, then
/// rank who is seeking donations. Network failures only degrade the ranking.
pub async fn collect(
    registry: &Registry,
    project: &Project,
    table: &DonationTable,
    progress: &dyn Progress,
) -> Summary {
    // The local tree has no maintainer lists, so ask the registry
    progress.phase(Phase::FetchingMaintainers);
    let records = registry.fetch_package_records(&project.installed).await;

    progress.phase(Phase::FetchingDownloads);
    let download_counts = registry.fetch_download_counts(&project.installed).await;

    let author_pkg_names = compute_authors_pkg_names(&records, &download_counts, &project.direct);
    let donations = match_donations(
        &author_pkg_names,
        &download_counts,
        &project.installed,
        table,
    );

    log::info!(
        target: "thanks::pipeline",
        "{} authors and {} teams seeking donations",
        donations.seeking_authors.len(),
        donations.seeking_packages.len()
    );

    Summary {
        donations,
        author_pkg_names,
        direct: project.direct.clone(),
    }
}
