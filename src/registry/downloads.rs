use std::collections::HashMap;

use anyhow::Result;
use futures::future::join_all;
use serde::Deserialize;

use super::Registry;
use crate::models::{DownloadCounts, PackageName};

const LOG_TARGET: &str = "thanks::downloads";

/// The bulk endpoint rejects requests for more packages than this.
pub const BULK_LIMIT: usize = 128;

#[derive(Debug, Deserialize)]
struct Point {
    downloads: u64,
}

impl Registry {
    /// Last-month download counts for `names`.
    ///
    /// Unscoped names are sent to the bulk endpoint in chunks of
    /// [`BULK_LIMIT`], one chunk at a time; a failed chunk leaves its packages
    /// without a count. Scoped names are not supported in bulk queries and are
    /// requested individually, concurrently.
    pub async fn fetch_download_counts(&self, names: &[String]) -> DownloadCounts {
        let (scoped, unscoped): (Vec<PackageName>, Vec<PackageName>) = names
            .iter()
            .map(|name| PackageName::parse(name))
            .partition(PackageName::is_scoped);

        let mut counts = DownloadCounts::new();

        for chunk in unscoped.chunks(BULK_LIMIT) {
            match self.fetch_bulk(chunk).await {
                Ok(chunk_counts) => counts.extend(chunk_counts),
                Err(err) => log::debug!(
                    target: LOG_TARGET,
                    "Skipping a chunk of {} packages: {}",
                    chunk.len(),
                    err
                ),
            }
        }

        let scoped_counts = join_all(scoped.iter().map(|name| async move {
            (name, self.fetch_point(name).await)
        }))
        .await;

        for (name, result) in scoped_counts {
            match result {
                Ok(Some(downloads)) => counts.insert(name.to_string(), downloads),
                Ok(None) => {}
                Err(err) => log::debug!(target: LOG_TARGET, "Skipping {}: {}", name, err),
            }
        }

        log::debug!(
            target: LOG_TARGET,
            "Got download counts for {} of {} packages",
            counts.len(),
            names.len()
        );
        counts
    }

    async fn fetch_bulk(&self, chunk: &[PackageName]) -> Result<DownloadCounts> {
        let joined = chunk
            .iter()
            .map(PackageName::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}{}", self.settings.downloads_url, joined);

        let response = self.client.get(&url).send().await?.error_for_status()?;

        // A single name gets the plain point response instead of a map
        if let [only] = chunk {
            let point: Option<Point> = response.json().await?;
            return Ok(point
                .map(|p| (only.to_string(), p.downloads))
                .into_iter()
                .collect());
        }

        // Packages that exist but have no stats come back as `null`
        let body: HashMap<String, Option<Point>> = response.json().await?;
        Ok(body
            .into_iter()
            .filter_map(|(name, point)| point.map(|p| (name, p.downloads)))
            .collect())
    }

    async fn fetch_point(&self, name: &PackageName) -> Result<Option<u64>> {
        let url = format!("{}{}", self.settings.downloads_url, name);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let point: Option<Point> = response.json().await?;
        Ok(point.map(|p| p.downloads))
    }
}
