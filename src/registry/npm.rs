use anyhow::Result;
use futures::future::join_all;
use reqwest::header::{ACCEPT, CACHE_CONTROL};

use super::Registry;
use crate::models::{PackageName, PackageRecord};

const LOG_TARGET: &str = "thanks::registry";

/// Metadata URL for a package.
///
/// Unscoped packages use the `/latest` shortcut. The registry does not support
/// version lookups for scoped packages, so those fetch the whole document with
/// the scope separator percent-encoded.
pub fn package_url(registry_url: &str, name: &PackageName) -> String {
    match name {
        PackageName::Unscoped(name) => format!("{}{}/latest", registry_url, name),
        PackageName::Scoped { scope, name } => format!("{}{}%2F{}", registry_url, scope, name),
    }
}

impl Registry {
    /// Fetch maintainers for one package. Any failure (not found, private
    /// package, timeout, unreadable body) yields `None`.
    pub async fn fetch_package_record(&self, name: &str) -> Option<PackageRecord> {
        let url = package_url(&self.settings.registry_url, &PackageName::parse(name));
        match self.get_record(&url).await {
            Ok(record) => record,
            Err(err) => {
                log::debug!(target: LOG_TARGET, "Skipping {}: {}", name, err);
                None
            }
        }
    }

    /// Fetch every record concurrently and wait for all of them to settle.
    /// Absent records are dropped; input order is kept.
    pub async fn fetch_package_records(&self, names: &[String]) -> Vec<PackageRecord> {
        let records = join_all(names.iter().map(|name| self.fetch_package_record(name))).await;
        let records: Vec<PackageRecord> = records.into_iter().flatten().collect();

        log::debug!(
            target: LOG_TARGET,
            "Fetched {} of {} package records",
            records.len(),
            names.len()
        );
        records
    }

    async fn get_record(&self, url: &str) -> Result<Option<PackageRecord>> {
        let response = self
            .registry_get(url)
            .header(ACCEPT, "application/json")
            // Let the registry answer from a stale cache entry
            .header(CACHE_CONTROL, "max-stale")
            .send()
            .await?;

        if !response.status().is_success() {
            log::debug!(target: LOG_TARGET, "GET {} returned {}", url, response.status());
            return Ok(None);
        }

        Ok(Some(response.json().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::models::Maintainer;
    use crate::registry::{test_settings, Auth, Registry};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_unscoped_url_uses_latest() {
        let url = package_url("https://registry.npmjs.org/", &PackageName::parse("left-pad"));
        assert_eq!(url, "https://registry.npmjs.org/left-pad/latest");
    }

    #[test]
    fn test_scoped_url_encodes_separator() {
        let url = package_url("https://registry.npmjs.org/", &PackageName::parse("@babel/core"));
        assert_eq!(url, "https://registry.npmjs.org/@babel%2Fcore");
    }

    #[tokio::test]
    async fn test_fetch_record_with_maintainers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/left-pad/latest"))
            .and(header("cache-control", "max-stale"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "left-pad",
                "version": "1.3.0",
                "maintainers": [{ "name": "feross", "email": "feross@example.com" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = Registry::new(test_settings(&server.uri())).unwrap();
        let record = registry.fetch_package_record("left-pad").await.unwrap();
        assert_eq!(record.name, "left-pad");
        assert_eq!(
            record.maintainers,
            Some(vec![Maintainer {
                name: "feross".to_string(),
                email: Some("feross@example.com".to_string()),
            }])
        );
    }

    #[tokio::test]
    async fn test_fetch_scoped_record() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/@scope%2Ffoo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "@scope/foo",
                "maintainers": [{ "name": "feross" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let registry = Registry::new(test_settings(&server.uri())).unwrap();
        let record = registry.fetch_package_record("@scope/foo").await.unwrap();
        assert_eq!(record.name, "@scope/foo");
    }

    #[tokio::test]
    async fn test_record_without_maintainers_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vargs/latest"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "name": "vargs" })),
            )
            .mount(&server)
            .await;

        let registry = Registry::new(test_settings(&server.uri())).unwrap();
        let record = registry.fetch_package_record("vargs").await.unwrap();
        assert_eq!(record.maintainers, None);
    }

    #[tokio::test]
    async fn test_failures_are_absent_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/left-pad/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "left-pad",
                "maintainers": [{ "name": "feross" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/garbled/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;
        // Anything else falls through to wiremock's 404

        let registry = Registry::new(test_settings(&server.uri())).unwrap();
        let names = vec![
            "missing-pkg".to_string(),
            "left-pad".to_string(),
            "garbled".to_string(),
        ];
        let records = registry.fetch_package_records(&names).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "left-pad");
    }

    #[tokio::test]
    async fn test_credential_is_passed_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/private-pkg/latest"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "private-pkg",
                "maintainers": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut settings = test_settings(&server.uri());
        settings.auth = Some(Auth::Bearer("s3cret".to_string()));
        let registry = Registry::new(settings).unwrap();
        assert!(registry.fetch_package_record("private-pkg").await.is_some());
    }

    #[tokio::test]
    async fn test_timed_out_record_is_absent_and_siblings_return() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow/latest"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "name": "slow",
                        "maintainers": [{ "name": "feross" }]
                    }))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "fast",
                "maintainers": [{ "name": "feross" }]
            })))
            .mount(&server)
            .await;

        let mut settings = test_settings(&server.uri());
        settings.timeout = Duration::from_millis(500);
        let registry = Registry::new(settings).unwrap();
        let names = vec!["slow".to_string(), "fast".to_string()];
        let records = registry.fetch_package_records(&names).await;
        let fetched: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(fetched, vec!["fast"]);
    }
}
