use anyhow::Result;
use serde::Serialize;

use crate::donations::DonationTable;
use crate::pipeline::Summary;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    authors: Vec<AuthorEntry<'a>>,
    teams: Vec<TeamEntry<'a>>,
    donate_links: &'a [String],
}

#[derive(Debug, Serialize)]
struct AuthorEntry<'a> {
    name: &'a str,
    donate_url: &'a str,
    packages: &'a [String],
}

#[derive(Debug, Serialize)]
struct TeamEntry<'a> {
    name: &'a str,
    donate_url: &'a str,
    direct: bool,
}

/// Serialize the summary as pretty-printed JSON.
pub fn to_string(summary: &Summary, table: &DonationTable) -> Result<String> {
    let donations = &summary.donations;

    let authors = donations
        .seeking_authors
        .iter()
        .map(|name| AuthorEntry {
            name,
            donate_url: table.author_url(name).unwrap_or_default(),
            packages: summary
                .author_pkg_names
                .get(name)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        })
        .collect();

    let teams = donations
        .seeking_packages
        .iter()
        .map(|name| TeamEntry {
            name,
            donate_url: table.package_url(name).unwrap_or_default(),
            direct: summary.direct.contains(name),
        })
        .collect();

    let report = JsonReport {
        authors,
        teams,
        donate_links: &donations.donate_links,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
